//! Population and coordinator configuration shared by every protocol.

use crate::error::{ProtocolError, Result};
use lightbulb_env::AgentId;
use serde::{Deserialize, Serialize};

/// Configuration for a protocol instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// Number of agents N (default: 100)
    pub population: u32,
    
    /// The agent that counts and certifies (default: agent 1)
    pub coordinator: AgentId,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            population: 100,
            coordinator: AgentId::new(1),
        }
    }
}

impl ProtocolConfig {
    /// Creates a configuration with the default coordinator.
    pub fn new(population: u32) -> Self {
        Self {
            population,
            ..Default::default()
        }
    }
    
    /// Sets the population.
    pub fn with_population(mut self, population: u32) -> Self {
        self.population = population;
        self
    }
    
    /// Sets the coordinator.
    pub fn with_coordinator(mut self, coordinator: AgentId) -> Self {
        self.coordinator = coordinator;
        self
    }
    
    /// Rejects a non-positive population or an out-of-range coordinator.
    pub fn validate(&self) -> Result<()> {
        if self.population == 0 {
            return Err(ProtocolError::invalid("population must be at least 1"));
        }
        self.coordinator.ensure_within(self.population).map_err(|e| {
            ProtocolError::invalid(format!("coordinator: {}", e))
        })
    }
    
    /// Units the coordinator must count before certifying (N - 1).
    pub fn target(&self) -> u64 {
        u64::from(self.population.saturating_sub(1))
    }
    
    /// Returns true if `agent` is the coordinator.
    pub fn is_coordinator(&self, agent: AgentId) -> bool {
        agent == self.coordinator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_default_config_is_valid() {
        let config = ProtocolConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.target(), 99);
        assert!(config.is_coordinator(AgentId::new(1)));
    }
    
    #[test]
    fn test_zero_population_rejected() {
        let err = ProtocolConfig::new(0).validate().unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidConfiguration(_)));
    }
    
    #[test]
    fn test_coordinator_outside_population_rejected() {
        let config = ProtocolConfig::new(5).with_coordinator(AgentId::new(6));
        assert!(config.validate().is_err());
        
        let config = ProtocolConfig::new(5).with_coordinator(AgentId::new(0));
        assert!(config.validate().is_err());
        
        let config = ProtocolConfig::new(5).with_coordinator(AgentId::new(5));
        assert!(config.validate().is_ok());
    }
}
