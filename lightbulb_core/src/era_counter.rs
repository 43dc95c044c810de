//! Adaptive era counter.
//!
//! Every ordinary agent starts with one unit. Early eras let agents merge
//! their units into larger holdings (1 + 1 = 2, 2 + 2 = 4, ...); later eras
//! let those holdings be shipped to the coordinator a chunk at a time, with
//! the chunk size shrinking back to 1 so any remainder can be reported
//! exactly. A single lit bit therefore carries `k` units during an era with
//! increment `k`.
//!
//! The coordinator certifies once its count reaches N - 1. Since units are
//! only moved (agent to signal, signal to agent, signal to coordinator, and
//! across era boundaries via [`LoadRule::convert`](crate::era::LoadRule::convert)), the count can never
//! exceed the units actually released, and reaching N - 1 means every
//! ordinary agent has released its own.

use crate::config::ProtocolConfig;
use crate::era::{EraMode, EraTable};
use crate::error::Result;
use crate::ledger::CreditLedger;
use crate::strategy::Strategy;
use lightbulb_env::{AgentId, SharedSignal};
use tracing::{debug, trace};

/// Counter whose signal worth changes era by era.
#[derive(Debug, Clone)]
pub struct EraCounter {
    config: ProtocolConfig,
    table: EraTable,
    ledger: CreditLedger,
    counted: u64,
    
    /// Completed steps
    elapsed: u64,
    
    /// Era the signal's current value was written in
    era_index: usize,
}

impl EraCounter {
    /// Creates an era counter with the standard table.
    pub fn new(config: ProtocolConfig) -> Result<Self> {
        Self::with_table(config, EraTable::standard())
    }
    
    /// Creates an era counter with a custom (already validated) table.
    pub fn with_table(config: ProtocolConfig, table: EraTable) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            ledger: CreditLedger::new(&config),
            config,
            table,
            counted: 0,
            elapsed: 0,
            era_index: 0,
        })
    }
    
    /// Index of the era the protocol is currently in.
    pub fn era_index(&self) -> usize {
        self.era_index
    }
    
    /// Completed steps.
    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }
    
    /// Read-only view of the ledger.
    pub fn ledger(&self) -> &CreditLedger {
        &self.ledger
    }
    
    /// The era table in use.
    pub fn table(&self) -> &EraTable {
        &self.table
    }
    
    /// Hands `amount` units to `agent`; the coordinator's share is counted
    /// directly.
    fn credit(&mut self, agent: AgentId, amount: u64) {
        if self.config.is_coordinator(agent) {
            self.counted += amount;
        } else {
            self.ledger.absorb(agent, amount);
        }
    }
    
    /// Runs the load rule of every era entered since the last step, for the
    /// agent activated now.
    fn enter_due_eras(&mut self, agent: AgentId, signal: &mut SharedSignal) {
        let due = self.table.index_at(self.elapsed);
        while self.era_index < due {
            let previous = *self.table.era(self.era_index);
            let next = *self.table.era(self.era_index + 1);
            
            let hand_off = next.load.convert(signal.read(), previous.increment, next.increment);
            signal.write(hand_off.stays_lit);
            if hand_off.released > 0 {
                self.credit(agent, hand_off.released);
            }
            
            self.era_index += 1;
            debug!(
                "Era {} begins at step {} (k={}, {:?}): {} counted, {} held",
                self.era_index,
                self.elapsed,
                next.increment,
                next.mode,
                self.counted,
                self.ledger.total()
            );
            debug!(
                "Hand-off by {} ({:?}): {} released, signal {}",
                agent,
                next.load,
                hand_off.released,
                if hand_off.stays_lit { "kept" } else { "cleared" }
            );
            debug!("Holdings: {:?}", self.ledger.distribution());
        }
    }
}

impl Strategy for EraCounter {
    fn name(&self) -> &'static str {
        "era"
    }
    
    fn config(&self) -> &ProtocolConfig {
        &self.config
    }
    
    fn observe(&mut self, agent: AgentId, signal: &mut SharedSignal) -> bool {
        self.enter_due_eras(agent, signal);
        self.elapsed += 1;
        
        let era = *self.table.era(self.era_index);
        let k = era.increment;
        
        if self.config.is_coordinator(agent) {
            if signal.read() {
                signal.write(false);
                self.counted += k;
                debug!("Coordinator collected {}, {} counted", k, self.counted);
            }
            return self.counted >= self.config.target();
        }
        
        let balance = self.ledger.balance(agent);
        if signal.read() {
            if era.mode == EraMode::Accumulate && balance == k {
                signal.write(false);
                self.ledger.absorb(agent, k);
                debug!("Agent {} merged {} into {}", agent, k, balance + k);
            }
        } else if balance >= k && self.ledger.release(agent, k) {
            signal.write(true);
            debug!("Agent {} lit the signal for {}", agent, k);
        } else {
            trace!("Agent {} holds {}, needs {}", agent, balance, k);
        }
        false
    }
    
    fn counted(&self) -> u64 {
        self.counted
    }
    
    fn outstanding(&self, signal: &SharedSignal) -> u64 {
        let signal_worth = if signal.read() {
            self.table.era(self.era_index).increment
        } else {
            0
        };
        self.ledger.total() + signal_worth
    }
    
    fn credited(&self) -> usize {
        self.ledger.contributors()
    }
}
