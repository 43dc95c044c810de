//! Simulation driver - runs protocols to certification.

use crate::context::{protocol_seed, SimContext};
use crate::oracle::VisitOracle;
use crate::strategies::{StrategyId, StrategyParams};

use lightbulb_core::{EraTable, ProtocolConfig, ProtocolError, Result, Strategy};
use lightbulb_env::{SharedSignal, SimulationContext};
use tracing::{debug, error, info};

/// Results from running one protocol to certification.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Strategy that was run
    pub strategy: &'static str,
    
    /// Schedule seed used
    pub seed: u64,
    
    /// Number of agents
    pub population: u32,
    
    /// Steps until certification
    pub steps: u64,
    
    /// Units the coordinator counted
    pub counted: u64,
    
    /// Distinct ordinary agents that released a unit
    pub credited: usize,
    
    /// Times the signal actually flipped
    pub signal_transitions: u64,
    
    /// Activations per agent, in identity order
    pub visits: Vec<u64>,
}

impl RunOutcome {
    /// Steps expressed as days-in-years (one step per day).
    pub fn years(&self) -> f64 {
        self.steps as f64 / 365.0
    }
    
    /// Mean activations per agent.
    pub fn mean_visits(&self) -> f64 {
        if self.visits.is_empty() {
            return 0.0;
        }
        self.visits.iter().sum::<u64>() as f64 / self.visits.len() as f64
    }
}

/// One protocol instance, its signal, and the ground truth.
pub struct Simulation<S> {
    /// The protocol under test
    strategy: S,
    
    /// The shared one-bit channel
    signal: SharedSignal,
    
    /// Who has really been activated
    oracle: VisitOracle,
    
    /// Completed steps
    steps: u64,
}

impl<S: Strategy> Simulation<S> {
    /// Creates a simulation with an unlit signal and no visits.
    pub fn new(strategy: S) -> Self {
        let population = strategy.config().population;
        Self {
            strategy,
            signal: SharedSignal::new(),
            oracle: VisitOracle::new(population),
            steps: 0,
        }
    }
    
    /// Runs one step: sample an agent, let it observe and act.
    ///
    /// Returns `Ok(true)` on a certification the oracle confirms, and
    /// `Err(PrematureCertification)` on one it does not.
    pub fn step<C: SimulationContext + ?Sized>(&mut self, ctx: &mut C) -> Result<bool> {
        let population = self.strategy.config().population;
        let agent = ctx.pick_agent(population);
        agent.ensure_within(population)?;
        
        self.oracle.record(agent);
        let certified = self.strategy.observe(agent, &mut self.signal);
        self.steps += 1;
        
        if !certified {
            return Ok(false);
        }
        
        if !self.oracle.all_visited() {
            error!(
                "{} certified at step {} with only {} of {} agents activated",
                self.strategy.name(),
                self.steps,
                self.oracle.distinct(),
                population
            );
            return Err(ProtocolError::PrematureCertification {
                step: self.steps,
                visited: self.oracle.distinct(),
                population: population as usize,
            });
        }
        Ok(true)
    }
    
    /// Steps until certification. There is no step limit.
    pub fn run<C: SimulationContext + ?Sized>(&mut self, ctx: &mut C) -> Result<RunOutcome> {
        while !self.step(ctx)? {}
        
        debug!(
            "{} certified after {} steps ({} counted, {} credited)",
            self.strategy.name(),
            self.steps,
            self.strategy.counted(),
            self.strategy.credited()
        );
        Ok(self.outcome(ctx.seed()))
    }
    
    /// Snapshot of the run so far.
    pub fn outcome(&self, seed: u64) -> RunOutcome {
        RunOutcome {
            strategy: self.strategy.name(),
            seed,
            population: self.strategy.config().population,
            steps: self.steps,
            counted: self.strategy.counted(),
            credited: self.strategy.credited(),
            signal_transitions: self.signal.transitions(),
            visits: self.oracle.counts().to_vec(),
        }
    }
    
    /// The protocol under test.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }
    
    /// The shared signal.
    pub fn signal(&self) -> &SharedSignal {
        &self.signal
    }
    
    /// Ground truth.
    pub fn oracle(&self) -> &VisitOracle {
        &self.oracle
    }
    
    /// Completed steps.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

/// Aggregate of independent seeded runs of one strategy.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    /// Strategy that was run
    pub strategy: StrategyId,
    
    /// First run's seed; run `i` uses `base_seed + i`
    pub base_seed: u64,
    
    /// Individual runs
    pub runs: Vec<RunOutcome>,
    
    /// Mean steps to certification
    pub mean_steps: f64,
    
    /// Fastest run
    pub min_steps: u64,
    
    /// Slowest run
    pub max_steps: u64,
    
    /// Mean activations per agent, averaged over runs
    pub mean_visits_per_agent: f64,
}

impl BatchSummary {
    fn from_runs(strategy: StrategyId, base_seed: u64, runs: Vec<RunOutcome>) -> Self {
        let count = runs.len().max(1) as f64;
        let mean_steps = runs.iter().map(|r| r.steps as f64).sum::<f64>() / count;
        let mean_visits_per_agent = runs.iter().map(|r| r.mean_visits()).sum::<f64>() / count;
        
        Self {
            strategy,
            base_seed,
            min_steps: runs.iter().map(|r| r.steps).min().unwrap_or(0),
            max_steps: runs.iter().map(|r| r.steps).max().unwrap_or(0),
            runs,
            mean_steps,
            mean_visits_per_agent,
        }
    }
    
    /// Mean steps expressed in years (one step per day).
    pub fn mean_years(&self) -> f64 {
        self.mean_steps / 365.0
    }
}

/// Runs batches of seeded simulations.
pub struct BatchRunner {
    /// Base seed
    seed: u64,
    
    /// Population and coordinator
    config: ProtocolConfig,
    
    /// Strategy tunables
    params: StrategyParams,
}

impl BatchRunner {
    /// Creates a batch runner.
    pub fn new(seed: u64, config: ProtocolConfig) -> Self {
        Self {
            seed,
            config,
            params: StrategyParams::default(),
        }
    }
    
    /// Sets the era table used by the era counter.
    pub fn with_era_table(mut self, table: EraTable) -> Self {
        self.params.era_table = table;
        self
    }
    
    /// Sets the relay counter's stash probability.
    pub fn with_stash_probability(mut self, probability: f64) -> Self {
        self.params.stash_probability = probability;
        self
    }
    
    /// The configuration every run uses.
    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }
    
    /// The strategy tunables every run uses.
    pub fn params(&self) -> &StrategyParams {
        &self.params
    }
    
    /// Runs one fresh instance with the given schedule seed.
    pub fn run_once(&self, strategy: StrategyId, seed: u64) -> Result<RunOutcome> {
        let instance = strategy.build(self.config, &self.params, protocol_seed(seed))?;
        let mut ctx = SimContext::new(seed);
        Simulation::new(instance).run(&mut ctx)
    }
    
    /// Runs `runs` independent instances and aggregates them.
    ///
    /// Stops at the first error; a premature certification is never retried.
    pub fn run(&self, strategy: StrategyId, runs: usize) -> Result<BatchSummary> {
        info!(
            "Starting batch: {} x{} (agents={}, seed={})",
            strategy.name(),
            runs,
            self.config.population,
            self.seed
        );
        
        let mut outcomes = Vec::with_capacity(runs);
        for offset in 0..runs {
            let seed = self.seed.wrapping_add(offset as u64);
            let outcome = self.run_once(strategy, seed)?;
            info!(
                "  {} seed={} certified after {} steps ({:.1} years)",
                strategy.name(),
                seed,
                outcome.steps,
                outcome.years()
            );
            outcomes.push(outcome);
        }
        
        Ok(BatchSummary::from_runs(strategy, self.seed, outcomes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ScriptedContext;
    use lightbulb_core::{EraCounter, NaiveCounter};
    use lightbulb_env::AgentId;
    
    /// Certifies the first time the coordinator sees a lit signal.
    struct EagerCoordinator {
        config: ProtocolConfig,
    }
    
    impl Strategy for EagerCoordinator {
        fn name(&self) -> &'static str {
            "eager"
        }
        
        fn config(&self) -> &ProtocolConfig {
            &self.config
        }
        
        fn observe(&mut self, agent: AgentId, signal: &mut SharedSignal) -> bool {
            if self.config.is_coordinator(agent) {
                return signal.read();
            }
            signal.write(true);
            false
        }
        
        fn counted(&self) -> u64 {
            0
        }
        
        fn outstanding(&self, _signal: &SharedSignal) -> u64 {
            0
        }
        
        fn credited(&self) -> usize {
            0
        }
    }
    
    #[test]
    fn test_scripted_naive_four_agents() {
        let strategy = NaiveCounter::new(ProtocolConfig::new(4)).unwrap();
        let mut sim = Simulation::new(strategy);
        let mut ctx = ScriptedContext::new(&[2, 3, 1, 4, 1, 3, 1]);
        
        for _ in 0..5 {
            assert!(!sim.step(&mut ctx).unwrap());
        }
        assert_eq!(sim.strategy().counted(), 2);
        
        let outcome = sim.run(&mut ctx).unwrap();
        assert_eq!(outcome.steps, 7);
        assert_eq!(outcome.counted, 3);
        assert_eq!(outcome.credited, 3);
        assert_eq!(outcome.visits, vec![3, 1, 2, 1]);
    }
    
    #[test]
    fn test_premature_certification_is_fatal() {
        let strategy = EagerCoordinator { config: ProtocolConfig::new(4) };
        let mut sim = Simulation::new(strategy);
        let mut ctx = ScriptedContext::new(&[2, 1]);
        
        let err = sim.run(&mut ctx).unwrap_err();
        assert!(err.is_correctness_violation());
        assert_eq!(
            err,
            ProtocolError::PrematureCertification {
                step: 2,
                visited: 2,
                population: 4,
            }
        );
    }
    
    #[test]
    fn test_out_of_range_agent_rejected() {
        let strategy = NaiveCounter::new(ProtocolConfig::new(3)).unwrap();
        let mut sim = Simulation::new(strategy);
        let mut ctx = ScriptedContext::new(&[4]);
        
        assert!(matches!(sim.step(&mut ctx), Err(ProtocolError::Env(_))));
    }
    
    #[test]
    fn test_two_agents_certify_after_set_and_clear() {
        let strategy = NaiveCounter::new(ProtocolConfig::new(2)).unwrap();
        let mut sim = Simulation::new(strategy);
        let outcome = sim.run(&mut SimContext::new(3)).unwrap();
        
        assert_eq!(outcome.counted, 1);
        assert_eq!(outcome.signal_transitions, 2);
        assert!(outcome.visits.iter().all(|v| *v > 0));
    }
    
    #[test]
    fn test_every_strategy_credits_all_ordinary_agents() {
        for population in [2u32, 3, 7, 20] {
            let runner = BatchRunner::new(11, ProtocolConfig::new(population));
            for strategy in StrategyId::all() {
                let summary = runner.run(strategy, 20).unwrap();
                for outcome in &summary.runs {
                    assert_eq!(outcome.counted, u64::from(population - 1));
                    assert_eq!(outcome.credited, population as usize - 1);
                    assert!(outcome.visits.iter().all(|v| *v > 0));
                }
            }
        }
    }
    
    #[test]
    fn test_same_seed_same_outcome() {
        let runner = BatchRunner::new(42, ProtocolConfig::new(30));
        for strategy in StrategyId::all() {
            let a = runner.run_once(strategy, 42).unwrap();
            let b = runner.run_once(strategy, 42).unwrap();
            assert_eq!(a.steps, b.steps);
            assert_eq!(a.visits, b.visits);
        }
    }
    
    #[test]
    fn test_naive_respects_coupon_collector_bound() {
        // Certification needs every agent visited, so no run can beat the
        // population size, and the mean must exceed N * H(N - 1).
        let population = 30u32;
        let runner = BatchRunner::new(5, ProtocolConfig::new(population));
        let summary = runner.run(StrategyId::Naive, 100).unwrap();
        
        let harmonic: f64 = (1..population).map(|i| 1.0 / i as f64).sum();
        assert!(summary.min_steps >= u64::from(population));
        assert!(summary.mean_steps > population as f64 * harmonic);
    }
    
    #[test]
    fn test_era_beats_naive_for_one_hundred_agents() {
        let runner = BatchRunner::new(1000, ProtocolConfig::default());
        let naive = runner.run(StrategyId::Naive, 100).unwrap();
        let era = runner.run(StrategyId::Era, 100).unwrap();
        
        assert!(
            era.mean_steps < naive.mean_steps,
            "era {} vs naive {}",
            era.mean_steps,
            naive.mean_steps
        );
    }
    
    #[test]
    fn test_custom_coordinator_in_batch() {
        let config = ProtocolConfig::new(10).with_coordinator(AgentId::new(10));
        let runner = BatchRunner::new(9, config);
        let summary = runner.run(StrategyId::Era, 10).unwrap();
        assert_eq!(summary.runs.len(), 10);
        assert!(summary.mean_visits_per_agent >= 1.0);
    }
    
    #[test]
    fn test_era_simulation_exposes_protocol_state() {
        let strategy = EraCounter::new(ProtocolConfig::new(12)).unwrap();
        let mut sim = Simulation::new(strategy);
        let outcome = sim.run(&mut SimContext::new(77)).unwrap();
        
        assert_eq!(sim.strategy().ledger().total(), 0);
        assert!(!sim.signal().read());
        assert_eq!(outcome.steps, sim.steps());
        assert!(sim.oracle().all_visited());
    }
    
    proptest::proptest! {
        #[test]
        fn test_certification_implies_all_visited(
            seed in proptest::prelude::any::<u64>(),
            population in 2u32..16,
            strategy_index in 0usize..4,
        ) {
            let strategy = StrategyId::all()[strategy_index];
            let runner = BatchRunner::new(seed, ProtocolConfig::new(population));
            let outcome = runner.run_once(strategy, seed).unwrap();
            
            proptest::prop_assert!(outcome.visits.iter().all(|v| *v > 0));
            proptest::prop_assert_eq!(outcome.counted, u64::from(population - 1));
            proptest::prop_assert_eq!(outcome.credited, population as usize - 1);
        }
    }
}
