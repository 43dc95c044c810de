//! Common types for the Lightbulb environment abstraction.

use crate::error::EnvError;
use serde::{Deserialize, Serialize};

/// Identity of one agent, in `1..=N`.
///
/// Identities are 1-based to match how the population is described
/// ("agent 1 is the coordinator"); [`AgentId::index`] gives the 0-based slot
/// for array-backed ledgers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl AgentId {
    /// Creates an AgentId from its 1-based number.
    pub fn new(id: u32) -> Self {
        Self(id)
    }
    
    /// Creates an AgentId from a 0-based slot index.
    pub fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }
    
    /// Returns the 0-based slot index.
    pub fn index(&self) -> usize {
        (self.0 as usize).saturating_sub(1)
    }
    
    /// Returns the 1-based number.
    pub fn get(&self) -> u32 {
        self.0
    }
    
    /// Checks that this identity belongs to a population of `population` agents.
    pub fn ensure_within(&self, population: u32) -> Result<(), EnvError> {
        if self.0 == 0 || self.0 > population {
            return Err(EnvError::AgentOutOfRange {
                agent: self.0,
                population,
            });
        }
        Ok(())
    }
    
    /// Iterates over every identity of a population, in order.
    pub fn all(population: u32) -> impl Iterator<Item = AgentId> {
        (1..=population).map(AgentId)
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self(1)
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_index_round_trip_is_one_based() {
        assert_eq!(AgentId::new(1).index(), 0);
        assert_eq!(AgentId::from_index(0), AgentId::new(1));
        assert_eq!(AgentId::from_index(41).get(), 42);
    }
    
    #[test]
    fn test_ensure_within_population() {
        assert!(AgentId::new(1).ensure_within(1).is_ok());
        assert!(AgentId::new(100).ensure_within(100).is_ok());
        assert!(AgentId::new(0).ensure_within(100).is_err());
        assert!(AgentId::new(101).ensure_within(100).is_err());
    }
    
    #[test]
    fn test_all_lists_population_in_order() {
        let ids: Vec<u32> = AgentId::all(4).map(|a| a.get()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(AgentId::all(0).count(), 0);
    }
}
