//! Relay counter protocol.
//!
//! The naive counter, plus stashing: an agent that has already reported may,
//! with a small probability, take a lit signal down and carry that unit
//! until it next finds the signal unlit. Units are moved, never created, so
//! the coordinator's count stays sound. The point is to spread reports out
//! over time instead of queueing them behind rare agents.

use crate::config::ProtocolConfig;
use crate::error::{ProtocolError, Result};
use crate::ledger::CreditLedger;
use crate::strategy::Strategy;
use lightbulb_env::{AgentId, SharedSignal};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Default chance that a reported agent stashes a lit signal.
pub const DEFAULT_STASH_PROBABILITY: f64 = 0.05;

/// Naive counter with probabilistic stashing.
#[derive(Debug, Clone)]
pub struct RelayCounter {
    config: ProtocolConfig,
    ledger: CreditLedger,
    counted: u64,
    
    /// Probability in [0, 1] of stashing a lit signal
    stash_probability: f64,
    
    /// Private coin, seeded separately from the schedule
    rng: ChaCha8Rng,
}

impl RelayCounter {
    /// Creates a relay counter with the default stash probability.
    pub fn new(config: ProtocolConfig, seed: u64) -> Result<Self> {
        Self::with_stash_probability(config, seed, DEFAULT_STASH_PROBABILITY)
    }
    
    /// Creates a relay counter with an explicit stash probability.
    pub fn with_stash_probability(config: ProtocolConfig, seed: u64, stash_probability: f64) -> Result<Self> {
        config.validate()?;
        if !(0.0..=1.0).contains(&stash_probability) {
            return Err(ProtocolError::invalid(format!(
                "stash probability {} is outside [0, 1]",
                stash_probability
            )));
        }
        
        Ok(Self {
            ledger: CreditLedger::new(&config),
            config,
            counted: 0,
            stash_probability,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }
    
    /// Read-only view of the ledger.
    pub fn ledger(&self) -> &CreditLedger {
        &self.ledger
    }
}

impl Strategy for RelayCounter {
    fn name(&self) -> &'static str {
        "relay"
    }
    
    fn config(&self) -> &ProtocolConfig {
        &self.config
    }
    
    fn observe(&mut self, agent: AgentId, signal: &mut SharedSignal) -> bool {
        if self.config.is_coordinator(agent) {
            if signal.read() {
                signal.write(false);
                self.counted += 1;
                debug!("Coordinator cleared signal, {} counted", self.counted);
            }
            return self.counted >= self.config.target();
        }
        
        if signal.read() {
            if self.ledger.has_released(agent) && self.rng.gen_bool(self.stash_probability) {
                signal.write(false);
                self.ledger.absorb(agent, 1);
                debug!("Agent {} stashed the signal ({} held)", agent, self.ledger.balance(agent));
            }
        } else if self.ledger.release(agent, 1) {
            signal.write(true);
            debug!("Agent {} lit the signal", agent);
        }
        false
    }
    
    fn counted(&self) -> u64 {
        self.counted
    }
    
    fn outstanding(&self, signal: &SharedSignal) -> u64 {
        self.ledger.total() + u64::from(signal.read())
    }
    
    fn credited(&self) -> usize {
        self.ledger.contributors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_zero_probability_matches_naive() {
        let config = ProtocolConfig::new(4);
        let mut relay = RelayCounter::with_stash_probability(config, 7, 0.0).unwrap();
        let mut signal = SharedSignal::new();
        
        let verdicts: Vec<bool> = [2, 3, 1, 4, 1, 3, 1]
            .iter()
            .map(|id| relay.observe(AgentId::new(*id), &mut signal))
            .collect();
        
        assert_eq!(verdicts.iter().filter(|v| **v).count(), 1);
        assert!(verdicts[6]);
    }
    
    #[test]
    fn test_certain_stash_moves_unit_into_ledger() {
        let config = ProtocolConfig::new(3);
        let mut relay = RelayCounter::with_stash_probability(config, 7, 1.0).unwrap();
        let mut signal = SharedSignal::new();
        
        // 2 reports and 3 lights, coordinator counts one
        relay.observe(AgentId::new(2), &mut signal);
        relay.observe(AgentId::new(1), &mut signal);
        relay.observe(AgentId::new(3), &mut signal);
        assert!(signal.read());
        
        // 2 has reported, so it stashes 3's unit
        relay.observe(AgentId::new(2), &mut signal);
        assert!(!signal.read());
        assert_eq!(relay.ledger().balance(AgentId::new(2)), 1);
        assert_eq!(relay.counted() + relay.outstanding(&signal), 2);
        
        // Unlit again: 2 puts the stashed unit back
        relay.observe(AgentId::new(2), &mut signal);
        assert!(signal.read());
        assert!(relay.observe(AgentId::new(1), &mut signal));
    }
    
    #[test]
    fn test_unreported_agent_never_stashes() {
        let config = ProtocolConfig::new(3);
        let mut relay = RelayCounter::with_stash_probability(config, 7, 1.0).unwrap();
        let mut signal = SharedSignal::new();
        
        relay.observe(AgentId::new(2), &mut signal);
        relay.observe(AgentId::new(3), &mut signal);
        assert!(signal.read());
        assert_eq!(relay.ledger().balance(AgentId::new(3)), 1);
    }
    
    #[test]
    fn test_probability_out_of_range_rejected() {
        let config = ProtocolConfig::new(3);
        assert!(RelayCounter::with_stash_probability(config, 0, 1.5).is_err());
        assert!(RelayCounter::with_stash_probability(config, 0, -0.1).is_err());
    }
}
