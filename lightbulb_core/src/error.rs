//! Error types for the coordination protocols.

use lightbulb_env::EnvError;
use thiserror::Error;

/// Result type for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors a protocol or its driver can report.
///
/// Neither variant is retryable: a bad configuration is rejected before the
/// first step, and a premature certification means the protocol design is
/// unsound for the given parameters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Population, coordinator or era table rejected at initialization
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    
    /// Completion was asserted before every agent had been activated
    #[error("Premature certification at step {step}: {visited} of {population} agents activated")]
    PrematureCertification {
        step: u64,
        visited: usize,
        population: usize,
    },
    
    /// Environment-level failure (bad agent identity, closed room)
    #[error("Environment error: {0}")]
    Env(#[from] EnvError),
}

impl ProtocolError {
    /// Creates an invalid-configuration error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
    
    /// Returns true for errors that indicate an unsound protocol design.
    pub fn is_correctness_violation(&self) -> bool {
        matches!(self, Self::PrematureCertification { .. })
    }
}
