//! Parity counter protocol.
//!
//! The parity of the step number gives the signal a second meaning. A lit
//! signal observed on an even step is worth 2 units, on an odd step 1 unit.
//! An ordinary agent pools what it holds with what the lit signal is worth
//! now, then leaves the signal lit iff the pool covers what it will be worth
//! on the next step, keeping the remainder.
//!
//! ```text
//! step:      1   2   3   4   5 ...
//! worth:     1   2   1   2   1 ...
//! ```

use crate::config::ProtocolConfig;
use crate::error::Result;
use crate::ledger::CreditLedger;
use crate::strategy::Strategy;
use lightbulb_env::{AgentId, SharedSignal};
use tracing::debug;

/// Worth of a lit signal observed on `step` (1-based).
pub fn parity_worth(step: u64) -> u64 {
    if step % 2 == 0 {
        2
    } else {
        1
    }
}

/// Counter whose signal carries one or two units depending on step parity.
#[derive(Debug, Clone)]
pub struct ParityCounter {
    config: ProtocolConfig,
    ledger: CreditLedger,
    counted: u64,
    
    /// Steps observed so far
    step: u64,
}

impl ParityCounter {
    /// Creates a parity counter for a validated configuration.
    pub fn new(config: ProtocolConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            ledger: CreditLedger::new(&config),
            config,
            counted: 0,
            step: 0,
        })
    }
    
    /// Read-only view of the ledger.
    pub fn ledger(&self) -> &CreditLedger {
        &self.ledger
    }
}

impl Strategy for ParityCounter {
    fn name(&self) -> &'static str {
        "parity"
    }
    
    fn config(&self) -> &ProtocolConfig {
        &self.config
    }
    
    fn observe(&mut self, agent: AgentId, signal: &mut SharedSignal) -> bool {
        self.step += 1;
        let worth_now = parity_worth(self.step);
        
        if self.config.is_coordinator(agent) {
            if signal.read() {
                signal.write(false);
                self.counted += worth_now;
                debug!("Coordinator collected {}, {} counted", worth_now, self.counted);
            }
            return self.counted >= self.config.target();
        }
        
        if signal.read() {
            self.ledger.absorb(agent, worth_now);
        }
        
        let worth_next = parity_worth(self.step + 1);
        let lit = self.ledger.release(agent, worth_next);
        signal.write(lit);
        if lit {
            debug!("Agent {} left the signal lit for {}", agent, worth_next);
        }
        false
    }
    
    fn counted(&self) -> u64 {
        self.counted
    }
    
    fn outstanding(&self, signal: &SharedSignal) -> u64 {
        // A lit signal was written for the step after the last one observed
        let signal_worth = if signal.read() {
            parity_worth(self.step + 1)
        } else {
            0
        };
        self.ledger.total() + signal_worth
    }
    
    fn credited(&self) -> usize {
        self.ledger.contributors()
    }
}
