//! The pluggable protocol abstraction.

use crate::config::ProtocolConfig;
use lightbulb_env::{AgentId, SharedSignal};

/// A coordination protocol.
///
/// The driver calls [`Strategy::observe`] once per step with the agent
/// activated that step and the shared signal. The strategy reads the signal,
/// optionally writes it, updates its private bookkeeping, and returns true
/// iff the coordinator certifies that every agent has been activated.
///
/// The driver validates `agent` against the population before calling.
pub trait Strategy: Send {
    /// Short name for logs and reports.
    fn name(&self) -> &'static str;
    
    /// The population and coordinator this instance was built for.
    fn config(&self) -> &ProtocolConfig;
    
    /// Observe and act for one step.
    fn observe(&mut self, agent: AgentId, signal: &mut SharedSignal) -> bool;
    
    /// Units the coordinator has counted so far.
    fn counted(&self) -> u64;
    
    /// Units not yet counted: everything held by agents plus what a lit
    /// signal is currently worth.
    fn outstanding(&self, signal: &SharedSignal) -> u64;
    
    /// Number of distinct ordinary agents that have released a unit.
    ///
    /// Instrumentation only; protocol decisions never depend on it.
    fn credited(&self) -> usize;
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }
    
    fn config(&self) -> &ProtocolConfig {
        (**self).config()
    }
    
    fn observe(&mut self, agent: AgentId, signal: &mut SharedSignal) -> bool {
        (**self).observe(agent, signal)
    }
    
    fn counted(&self) -> u64 {
        (**self).counted()
    }
    
    fn outstanding(&self, signal: &SharedSignal) -> u64 {
        (**self).outstanding(signal)
    }
    
    fn credited(&self) -> usize {
        (**self).credited()
    }
}
