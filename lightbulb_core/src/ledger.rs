//! Per-agent credit bookkeeping.
//!
//! Every ordinary agent starts holding exactly one unit: the fact "I have
//! been activated". A unit leaves an agent's hands only while that agent is
//! active (by lighting the signal), and enters them only by picking a lit
//! signal up. The coordinator holds nothing; whatever it collects goes
//! straight into its count.
//!
//! Because units are only ever moved, never minted,
//!
//! ```text
//! counted + ledger total + worth(signal) == N - 1
//! ```
//!
//! holds after every step. When the count reaches N - 1 every ledger entry is
//! zero, so every ordinary agent has released its own unit at least once,
//! which it can only do while active.

use crate::config::ProtocolConfig;
use lightbulb_env::AgentId;

/// Fixed-size credit ledger indexed by agent identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditLedger {
    /// Units held, indexed by `AgentId::index()`
    credits: Vec<u64>,
    
    /// Whether each agent has ever released a unit onto the signal
    released: Vec<bool>,
    
    /// Excluded from all bookkeeping
    coordinator: AgentId,
}

impl CreditLedger {
    /// Creates a ledger with one unit per ordinary agent and none for the
    /// coordinator.
    pub fn new(config: &ProtocolConfig) -> Self {
        let population = config.population as usize;
        let mut credits = vec![1u64; population];
        if let Some(slot) = credits.get_mut(config.coordinator.index()) {
            *slot = 0;
        }
        
        Self {
            credits,
            released: vec![false; population],
            coordinator: config.coordinator,
        }
    }
    
    /// Units currently held by `agent`.
    pub fn balance(&self, agent: AgentId) -> u64 {
        self.credits.get(agent.index()).copied().unwrap_or(0)
    }
    
    /// Moves `amount` units from `agent` onto the signal.
    ///
    /// Returns false (and changes nothing) if the agent holds too little.
    pub fn release(&mut self, agent: AgentId, amount: u64) -> bool {
        if agent == self.coordinator {
            return false;
        }
        match self.credits.get_mut(agent.index()) {
            Some(balance) if *balance >= amount => {
                *balance -= amount;
                self.released[agent.index()] = true;
                true
            }
            _ => false,
        }
    }
    
    /// Gives `amount` units to `agent`.
    ///
    /// The coordinator never holds credit; callers route its share into the
    /// running count instead.
    pub fn absorb(&mut self, agent: AgentId, amount: u64) {
        if agent == self.coordinator {
            return;
        }
        if let Some(balance) = self.credits.get_mut(agent.index()) {
            *balance += amount;
        }
    }
    
    /// Total units still held by ordinary agents.
    pub fn total(&self) -> u64 {
        self.credits.iter().sum()
    }
    
    /// Number of distinct ordinary agents that have released a unit.
    pub fn contributors(&self) -> usize {
        self.released.iter().filter(|r| **r).count()
    }
    
    /// Returns true if `agent` has ever released a unit.
    pub fn has_released(&self, agent: AgentId) -> bool {
        self.released.get(agent.index()).copied().unwrap_or(false)
    }
    
    /// Histogram of balances: `(balance, number of ordinary agents holding it)`,
    /// sorted by balance.
    pub fn distribution(&self) -> Vec<(u64, usize)> {
        let mut histogram = std::collections::BTreeMap::new();
        for (index, balance) in self.credits.iter().enumerate() {
            if AgentId::from_index(index) == self.coordinator {
                continue;
            }
            *histogram.entry(*balance).or_insert(0usize) += 1;
        }
        histogram.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    fn ledger(population: u32) -> CreditLedger {
        CreditLedger::new(&ProtocolConfig::new(population))
    }
    
    #[test]
    fn test_coordinator_starts_empty() {
        let ledger = ledger(5);
        assert_eq!(ledger.balance(AgentId::new(1)), 0);
        assert_eq!(ledger.balance(AgentId::new(2)), 1);
        assert_eq!(ledger.total(), 4);
        assert_eq!(ledger.contributors(), 0);
    }
    
    #[test]
    fn test_release_requires_balance() {
        let mut ledger = ledger(3);
        let agent = AgentId::new(2);
        
        assert!(!ledger.release(agent, 2));
        assert!(ledger.release(agent, 1));
        assert!(!ledger.release(agent, 1));
        
        assert_eq!(ledger.balance(agent), 0);
        assert!(ledger.has_released(agent));
        assert_eq!(ledger.contributors(), 1);
    }
    
    #[test]
    fn test_coordinator_excluded() {
        let mut ledger = ledger(3);
        let coordinator = AgentId::new(1);
        
        ledger.absorb(coordinator, 8);
        assert_eq!(ledger.balance(coordinator), 0);
        assert!(!ledger.release(coordinator, 0));
        assert_eq!(ledger.contributors(), 0);
    }
    
    #[test]
    fn test_absorb_then_release_conserves_total() {
        let mut ledger = ledger(4);
        assert!(ledger.release(AgentId::new(2), 1));
        ledger.absorb(AgentId::new(3), 1);
        
        assert_eq!(ledger.total(), 3);
        assert_eq!(ledger.balance(AgentId::new(3)), 2);
        assert_eq!(ledger.distribution(), vec![(0, 1), (1, 1), (2, 1)]);
    }
}
