//! Error types for the Lightbulb environment abstraction.

use thiserror::Error;

/// Errors that can occur in the environment abstraction layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvError {
    /// An agent identity lies outside `1..=population`
    #[error("Agent #{agent} is outside population 1..={population}")]
    AgentOutOfRange { agent: u32, population: u32 },
    
    /// A population with no agents cannot be scheduled
    #[error("Population must contain at least one agent")]
    EmptyPopulation,
    
    /// The room was dropped while a visit was pending
    #[error("Room closed: {0}")]
    RoomClosed(String),
}

impl EnvError {
    /// Creates a room-closed error.
    pub fn room_closed(msg: impl Into<String>) -> Self {
        Self::RoomClosed(msg.into())
    }
}
