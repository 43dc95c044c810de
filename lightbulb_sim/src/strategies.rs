//! Catalogue of runnable protocols.

use lightbulb_core::{
    EraCounter, EraTable, NaiveCounter, ParityCounter, ProtocolConfig, RelayCounter, Result, Strategy,
    DEFAULT_STASH_PROBABILITY,
};

/// Strategy identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyId {
    /// Each agent reports once; coordinator counts clears
    Naive,
    
    /// Naive plus probabilistic stashing of reports
    Relay,
    
    /// Step parity doubles what a lit signal is worth
    Parity,
    
    /// Era table merges and ships credit in bulk
    Era,
}

/// Tunables shared by every strategy built from the catalogue.
#[derive(Debug, Clone)]
pub struct StrategyParams {
    /// Era table for the era counter
    pub era_table: EraTable,
    
    /// Stash probability for the relay counter
    pub stash_probability: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            era_table: EraTable::standard(),
            stash_probability: DEFAULT_STASH_PROBABILITY,
        }
    }
}

impl StrategyId {
    /// Returns a list of all strategies.
    pub fn all() -> Vec<StrategyId> {
        vec![
            StrategyId::Naive,
            StrategyId::Relay,
            StrategyId::Parity,
            StrategyId::Era,
        ]
    }
    
    /// Returns the strategy name.
    pub fn name(&self) -> &'static str {
        match self {
            StrategyId::Naive => "naive",
            StrategyId::Relay => "relay",
            StrategyId::Parity => "parity",
            StrategyId::Era => "era",
        }
    }
    
    /// Returns a description of the strategy.
    pub fn description(&self) -> &'static str {
        match self {
            StrategyId::Naive => "One report per agent, coordinator counts each clear",
            StrategyId::Relay => "Reported agents may stash a lit signal and re-raise it later",
            StrategyId::Parity => "Lit on an even step is worth 2, on an odd step 1",
            StrategyId::Era => "Era table: merge credit into powers of two, then ship in bulk",
        }
    }
    
    /// Builds a fresh instance.
    ///
    /// `seed` feeds the strategy's private randomness (relay only).
    pub fn build(&self, config: ProtocolConfig, params: &StrategyParams, seed: u64) -> Result<Box<dyn Strategy>> {
        let strategy: Box<dyn Strategy> = match self {
            StrategyId::Naive => Box::new(NaiveCounter::new(config)?),
            StrategyId::Relay => Box::new(RelayCounter::with_stash_probability(
                config,
                seed,
                params.stash_probability,
            )?),
            StrategyId::Parity => Box::new(ParityCounter::new(config)?),
            StrategyId::Era => Box::new(EraCounter::with_table(config, params.era_table.clone())?),
        };
        Ok(strategy)
    }
}

impl std::fmt::Display for StrategyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for StrategyId {
    type Err = String;
    
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "naive" | "counter" => Ok(StrategyId::Naive),
            "relay" | "random_counter" => Ok(StrategyId::Relay),
            "parity" | "day_counter" => Ok(StrategyId::Parity),
            "era" | "era_counter" | "adaptive" => Ok(StrategyId::Era),
            _ => Err(format!("Unknown strategy: {}", s)),
        }
    }
}
