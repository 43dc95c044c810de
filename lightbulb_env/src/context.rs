//! Activation schedule abstraction.

use crate::types::AgentId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The central interface for choosing who is active.
///
/// This trait abstracts the "warden" so that the same driver can run
/// against a seeded schedule (simulation), an entropy-backed schedule
/// (exploration), or a scripted sequence (exact scenario tests).
///
/// # Implementations
///
/// - **Exploration**: `EntropyContext` - OS-seeded `StdRng`
/// - **Simulation**: `SimContext` - `ChaCha8Rng(seed)`
/// - **Scenario tests**: `ScriptedContext` - replays a fixed sequence
///
/// # Determinism
///
/// For reproducible runs, all scheduling randomness must come from the
/// implementation, never from the protocol.
pub trait SimulationContext: Send {
    /// Picks the agent activated this step, uniformly over `1..=population`.
    ///
    /// Callers guarantee `population >= 1`.
    fn pick_agent(&mut self, population: u32) -> AgentId;
    
    /// Returns the context's seed (for logging/debugging).
    ///
    /// Unseeded contexts return 0.
    fn seed(&self) -> u64;
}

/// Context backed by OS entropy.
///
/// Every run is different; use it for exploration, not for tests.
pub struct EntropyContext {
    rng: StdRng,
}

impl EntropyContext {
    /// Creates a new EntropyContext.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for EntropyContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationContext for EntropyContext {
    fn pick_agent(&mut self, population: u32) -> AgentId {
        AgentId::new(self.rng.gen_range(1..=population))
    }
    
    fn seed(&self) -> u64 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_entropy_context_stays_in_range() {
        let mut ctx = EntropyContext::new();
        for _ in 0..1000 {
            let agent = ctx.pick_agent(7);
            assert!(agent.ensure_within(7).is_ok());
        }
    }
    
    #[test]
    fn test_entropy_context_single_agent() {
        let mut ctx = EntropyContext::new();
        assert_eq!(ctx.pick_agent(1), AgentId::new(1));
        assert_eq!(ctx.seed(), 0);
    }
}
