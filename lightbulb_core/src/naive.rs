//! Naive counter protocol.
//!
//! One designated coordinator is the only agent allowed to clear the signal.
//! Every other agent lights it exactly once, the first time it finds it
//! unlit. The coordinator counts each clear and certifies at N - 1.
//!
//! Correct, and slow: late agents are increasingly rare to sample, and each
//! of them must be followed by a coordinator visit before the next can
//! report.

use crate::config::ProtocolConfig;
use crate::error::Result;
use crate::ledger::CreditLedger;
use crate::strategy::Strategy;
use lightbulb_env::{AgentId, SharedSignal};
use tracing::{debug, trace};

/// The one-unit-per-agent counter.
#[derive(Debug, Clone)]
pub struct NaiveCounter {
    config: ProtocolConfig,
    ledger: CreditLedger,
    counted: u64,
}

impl NaiveCounter {
    /// Creates a counter for a validated configuration.
    pub fn new(config: ProtocolConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            ledger: CreditLedger::new(&config),
            config,
            counted: 0,
        })
    }
    
    /// Read-only view of the ledger.
    pub fn ledger(&self) -> &CreditLedger {
        &self.ledger
    }
}

impl Strategy for NaiveCounter {
    fn name(&self) -> &'static str {
        "naive"
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
        
        if !signal.read() && self.ledger.release(agent, 1) {
            signal.write(true);
            debug!("Agent {} lit the signal", agent);
        } else {
            trace!("Agent {} passes", agent);
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
    
    fn replay(strategy: &mut NaiveCounter, signal: &mut SharedSignal, sequence: &[u32]) -> Vec<bool> {
        sequence
            .iter()
            .map(|id| strategy.observe(AgentId::new(*id), signal))
            .collect()
    }
    
    #[test]
    fn test_four_agent_sequence() {
        let mut strategy = NaiveCounter::new(ProtocolConfig::new(4)).unwrap();
        let mut signal = SharedSignal::new();
        
        // 2 lights, 3 finds it lit, coordinator counts, 4 lights, coordinator counts
        let verdicts = replay(&mut strategy, &mut signal, &[2, 3, 1, 4, 1]);
        assert_eq!(verdicts, vec![false; 5]);
        assert_eq!(strategy.counted(), 2);
        assert!(!signal.read());
        assert_eq!(strategy.ledger().balance(AgentId::new(3)), 1);
        
        // Agent 3 has not reported yet, so the next two steps finish the job
        let verdicts = replay(&mut strategy, &mut signal, &[3, 1]);
        assert_eq!(verdicts, vec![false, true]);
        assert_eq!(strategy.counted(), 3);
        assert_eq!(strategy.credited(), 3);
        assert_eq!(strategy.outstanding(&signal), 0);
    }
    
    #[test]
    fn test_two_agents_need_one_set_and_one_clear() {
        let mut strategy = NaiveCounter::new(ProtocolConfig::new(2)).unwrap();
        let mut signal = SharedSignal::new();
        
        // Coordinator first: nothing to count yet
        assert!(!strategy.observe(AgentId::new(1), &mut signal));
        assert!(!strategy.observe(AgentId::new(2), &mut signal));
        assert!(strategy.observe(AgentId::new(1), &mut signal));
        assert_eq!(signal.transitions(), 2);
    }
    
    #[test]
    fn test_agent_contributes_only_once() {
        let mut strategy = NaiveCounter::new(ProtocolConfig::new(3)).unwrap();
        let mut signal = SharedSignal::new();
        
        replay(&mut strategy, &mut signal, &[2, 1, 2, 1, 2, 1]);
        assert_eq!(strategy.counted(), 1);
        assert_eq!(strategy.credited(), 1);
    }
    
    #[test]
    fn test_single_agent_certifies_on_first_visit() {
        let mut strategy = NaiveCounter::new(ProtocolConfig::new(1)).unwrap();
        let mut signal = SharedSignal::new();
        assert!(strategy.observe(AgentId::new(1), &mut signal));
    }
    
    #[test]
    fn test_custom_coordinator() {
        let config = ProtocolConfig::new(3).with_coordinator(AgentId::new(3));
        let mut strategy = NaiveCounter::new(config).unwrap();
        let mut signal = SharedSignal::new();
        
        let verdicts = replay(&mut strategy, &mut signal, &[1, 3, 2, 3]);
        assert_eq!(verdicts, vec![false, false, false, true]);
    }
    
    #[test]
    fn test_invalid_config_rejected() {
        assert!(NaiveCounter::new(ProtocolConfig::new(0)).is_err());
    }
}
