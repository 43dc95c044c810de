//! JSON exporter for batch results.
//!
//! Exports per-run step counts and per-agent activation counts for offline
//! statistics.

use crate::runner::{BatchSummary, RunOutcome};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;

/// One run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunExport {
    pub seed: u64,
    pub steps: u64,
    pub counted: u64,
    pub credited: usize,
    pub signal_transitions: u64,
    
    /// Activations per agent, in identity order
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub visits: Vec<u64>,
}

impl From<&RunOutcome> for RunExport {
    fn from(outcome: &RunOutcome) -> Self {
        Self {
            seed: outcome.seed,
            steps: outcome.steps,
            counted: outcome.counted,
            credited: outcome.credited,
            signal_transitions: outcome.signal_transitions,
            visits: outcome.visits.clone(),
        }
    }
}

/// One strategy's batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchExport {
    pub strategy: String,
    pub base_seed: u64,
    pub mean_steps: f64,
    pub mean_years: f64,
    pub min_steps: u64,
    pub max_steps: u64,
    pub mean_visits_per_agent: f64,
    pub runs: Vec<RunExport>,
}

impl From<&BatchSummary> for BatchExport {
    fn from(summary: &BatchSummary) -> Self {
        Self {
            strategy: summary.strategy.name().to_string(),
            base_seed: summary.base_seed,
            mean_steps: summary.mean_steps,
            mean_years: summary.mean_years(),
            min_steps: summary.min_steps,
            max_steps: summary.max_steps,
            mean_visits_per_agent: summary.mean_visits_per_agent,
            runs: summary.runs.iter().map(RunExport::from).collect(),
        }
    }
}

/// Complete simulation export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimExport {
    /// Number of agents
    pub population: u32,
    
    /// Coordinator identity
    pub coordinator: u32,
    
    /// All batches
    pub batches: Vec<BatchExport>,
}

impl SimExport {
    /// Creates a new export container.
    pub fn new(population: u32, coordinator: u32) -> Self {
        Self {
            population,
            coordinator,
            batches: Vec::new(),
        }
    }
    
    /// Adds a batch.
    pub fn add_batch(&mut self, summary: &BatchSummary) {
        self.batches.push(BatchExport::from(summary));
    }
    
    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
