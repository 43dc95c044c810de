//! Ground truth oracle for simulation.
//!
//! The Oracle keeps the "God's eye view" the protocols are denied: who has
//! actually been activated, and how often. The driver consults it whenever a
//! protocol certifies; protocols never see it.

use lightbulb_env::AgentId;

/// Per-agent activation record.
#[derive(Debug, Clone)]
pub struct VisitOracle {
    /// Activations, indexed by `AgentId::index()`
    visits: Vec<u64>,
    
    /// Number of agents activated at least once
    distinct: usize,
}

impl VisitOracle {
    /// Creates an oracle for `population` agents, none visited.
    pub fn new(population: u32) -> Self {
        Self {
            visits: vec![0; population as usize],
            distinct: 0,
        }
    }
    
    /// Records one activation.
    pub fn record(&mut self, agent: AgentId) {
        if let Some(count) = self.visits.get_mut(agent.index()) {
            if *count == 0 {
                self.distinct += 1;
            }
            *count += 1;
        }
    }
    
    /// Activations of `agent` so far.
    pub fn visits(&self, agent: AgentId) -> u64 {
        self.visits.get(agent.index()).copied().unwrap_or(0)
    }
    
    /// Number of agents activated at least once.
    pub fn distinct(&self) -> usize {
        self.distinct
    }
    
    /// Returns true once every agent has been activated.
    pub fn all_visited(&self) -> bool {
        self.distinct == self.visits.len()
    }
    
    /// Mean activations per agent.
    pub fn mean_visits(&self) -> f64 {
        if self.visits.is_empty() {
            return 0.0;
        }
        self.visits.iter().sum::<u64>() as f64 / self.visits.len() as f64
    }
    
    /// All per-agent counts, in identity order.
    pub fn counts(&self) -> &[u64] {
        &self.visits
    }
}
