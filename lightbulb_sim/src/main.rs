//! Lightbulb Simulator CLI
//!
//! Run batches of seeded simulations and report average steps to certification.

use clap::Parser;
use lightbulb_core::{EraTable, ProtocolConfig};
use lightbulb_env::AgentId;
use lightbulb_sim::{protocol_seed, run_concurrent, BatchRunner, BatchSummary, SimContext, SimExport, StrategyId};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Lightbulb coordination protocol simulator
#[derive(Parser, Debug)]
#[command(name = "lightbulb-sim")]
#[command(about = "Simulate single-bit coordination protocols", long_about = None)]
struct Args {
    /// Master seed for determinism (0 = random from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,
    
    /// Number of agents
    #[arg(short, long, default_value = "100")]
    agents: u32,
    
    /// Coordinator identity (1-based)
    #[arg(short, long, default_value = "1")]
    coordinator: u32,
    
    /// Strategy to run (naive, relay, parity, era, all)
    #[arg(short = 'S', long, default_value = "era")]
    strategy: String,
    
    /// Number of seeded runs per strategy
    #[arg(short, long, default_value = "10")]
    runs: usize,
    
    /// JSON file with a custom era table
    #[arg(long)]
    era_table: Option<String>,
    
    /// Run each agent as its own tokio task (single run per strategy)
    #[arg(long)]
    concurrent: bool,
    
    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
    
    /// JSON output for scripting
    #[arg(long)]
    json: bool,
    
    /// Export batch results to a JSON file
    #[arg(long)]
    export: Option<String>,
}

fn load_era_table(path: &str) -> Result<EraTable, String> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
    serde_json::from_str(&text).map_err(|e| format!("{}: {}", path, e))
}

fn main() {
    let args = Args::parse();
    
    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
    
    if !args.json {
        info!("Lightbulb Simulator v0.1.0");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }
    
    // Parse strategies
    let strategies: Vec<StrategyId> = if args.strategy == "all" {
        StrategyId::all()
    } else {
        vec![args.strategy.parse().unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            eprintln!("Available strategies: naive, relay, parity, era, all");
            std::process::exit(1);
        })]
    };
    
    let config = ProtocolConfig::new(args.agents).with_coordinator(AgentId::new(args.coordinator));
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    
    // Determine base seed
    let base_seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(1)
    } else {
        args.seed
    };
    
    let mut runner = BatchRunner::new(base_seed, config);
    if let Some(path) = &args.era_table {
        match load_era_table(path) {
            Ok(table) => runner = runner.with_era_table(table),
            Err(e) => {
                eprintln!("Error: invalid era table {}", e);
                std::process::exit(1);
            }
        }
    }
    
    // Handle --concurrent mode
    if args.concurrent {
        let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
            Ok(runtime) => runtime,
            Err(e) => {
                eprintln!("Error: failed to start tokio runtime: {}", e);
                std::process::exit(1);
            }
        };
        
        let mut failed = false;
        for strategy in &strategies {
            let result = strategy
                .build(config, runner.params(), protocol_seed(base_seed))
                .and_then(|instance| runtime.block_on(run_concurrent(instance, &mut SimContext::new(base_seed))));
            match result {
                Ok(outcome) => info!(
                    "✓ {} (seed={}) certified concurrently after {} steps ({:.1} years)",
                    strategy.name(),
                    base_seed,
                    outcome.steps,
                    outcome.years()
                ),
                Err(e) => {
                    error!("✗ {} (seed={}) FAILED: {}", strategy.name(), base_seed, e);
                    failed = true;
                }
            }
        }
        if failed {
            std::process::exit(1);
        }
        return;
    }
    
    // Run batches
    let mut summaries: Vec<BatchSummary> = Vec::new();
    let mut failures: Vec<(StrategyId, String)> = Vec::new();
    
    for strategy in &strategies {
        if !args.json {
            info!("{}: {}", strategy.name(), strategy.description());
        }
        match runner.run(*strategy, args.runs) {
            Ok(summary) => {
                if !args.json {
                    info!(
                        "✓ {} average: {:.0} steps ({:.1} years), {:.1} visits per agent, range {}..{}",
                        strategy.name(),
                        summary.mean_steps,
                        summary.mean_years(),
                        summary.mean_visits_per_agent,
                        summary.min_steps,
                        summary.max_steps
                    );
                }
                summaries.push(summary);
            }
            Err(e) => {
                error!("✗ {} FAILED: {}", strategy.name(), e);
                failures.push((*strategy, e.to_string()));
            }
        }
    }
    
    if let Some(path) = &args.export {
        let mut export = SimExport::new(config.population, config.coordinator.get());
        for summary in &summaries {
            export.add_batch(summary);
        }
        if let Err(e) = export.write_to_file(path) {
            error!("Failed to write export: {:?}", e);
        } else if !args.json {
            info!("Exported {} batches to {}", export.batches.len(), path);
        }
    }
    
    if args.json {
        // JSON output for scripting
        let summary = serde_json::json!({
            "agents": config.population,
            "coordinator": config.coordinator.get(),
            "seed": base_seed,
            "failed": failures.len(),
            "results": summaries.iter().map(|s| {
                serde_json::json!({
                    "strategy": s.strategy.name(),
                    "runs": s.runs.len(),
                    "mean_steps": s.mean_steps,
                    "mean_years": s.mean_years(),
                    "min_steps": s.min_steps,
                    "max_steps": s.max_steps,
                    "mean_visits_per_agent": s.mean_visits_per_agent,
                })
            }).collect::<Vec<_>>(),
            "failures": failures.iter().map(|(id, reason)| {
                serde_json::json!({ "strategy": id.name(), "reason": reason })
            }).collect::<Vec<_>>(),
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => error!("Failed to render JSON: {}", e),
        }
    } else {
        info!("");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        
        if failures.is_empty() {
            info!("✅ All {} strategies certified correctly!", summaries.len());
        } else {
            error!("❌ {}/{} strategies failed!", failures.len(), strategies.len());
            for (id, reason) in &failures {
                error!("  - {}: {}", id.name(), reason);
            }
        }
    }
    
    // Exit with proper code for CI
    if !failures.is_empty() {
        std::process::exit(1);
    }
}
