//! Simulation contexts implementing SimulationContext for deterministic testing.

use lightbulb_env::{AgentId, SimulationContext};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Derives the seed for a protocol's private randomness from a run seed, so
/// that it never shares a stream with the schedule.
pub fn protocol_seed(run_seed: u64) -> u64 {
    run_seed.wrapping_mul(0x9e3779b97f4a7c15)
}

/// Simulation context backed by a seeded ChaCha8 RNG.
///
/// The same seed always produces the same activation schedule.
pub struct SimContext {
    /// Master seed for this simulation
    seed: u64,
    
    /// Deterministic RNG for the schedule
    rng: ChaCha8Rng,
    
    /// Agents picked so far
    picks: u64,
}

impl SimContext {
    /// Creates a new SimContext with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            picks: 0,
        }
    }
    
    /// Returns how many agents have been picked.
    pub fn picks(&self) -> u64 {
        self.picks
    }
}

impl SimulationContext for SimContext {
    fn pick_agent(&mut self, population: u32) -> AgentId {
        self.picks += 1;
        AgentId::new(self.rng.gen_range(1..=population))
    }
    
    fn seed(&self) -> u64 {
        self.seed
    }
}

/// Context that replays a fixed activation sequence, cycling when exhausted.
///
/// Used to pin exact scenarios in tests.
pub struct ScriptedContext {
    sequence: Vec<AgentId>,
    cursor: usize,
}

impl ScriptedContext {
    /// Creates a scripted context from 1-based agent numbers.
    ///
    /// An empty script always picks agent 1.
    pub fn new(sequence: &[u32]) -> Self {
        Self {
            sequence: sequence.iter().copied().map(AgentId::new).collect(),
            cursor: 0,
        }
    }
}

impl SimulationContext for ScriptedContext {
    fn pick_agent(&mut self, _population: u32) -> AgentId {
        if self.sequence.is_empty() {
            return AgentId::new(1);
        }
        let agent = self.sequence[self.cursor % self.sequence.len()];
        self.cursor += 1;
        agent
    }
    
    fn seed(&self) -> u64 {
        0
    }
}
