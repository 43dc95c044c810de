//! Lightbulb Deterministic Simulation Harness
//!
//! This crate provides the warden: a controlled environment in which a
//! coordination protocol runs step by step until its coordinator certifies.
//!
//! # Core Principle
//!
//! All sources of non-determinism are controlled:
//! - **Schedule**: the activated agent comes from a ChaCha8 stream seeded by the run seed
//! - **Protocol randomness**: derived from the run seed on a separate stream
//! - **Ground truth**: an oracle the protocol cannot see checks every certification
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Simulation                            │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │ SimContext (seeded schedule: who is active this step) │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │                 │ agent id                                  │
//! │  ┌──────────────▼───────────────┐    ┌──────────────────┐   │
//! │  │ Strategy::observe(agent, &mut │───►│  SharedSignal    │   │
//! │  │                  signal)      │    │  (one bit)       │   │
//! │  └──────────────┬───────────────┘    └──────────────────┘   │
//! │                 │ certified?                                │
//! │  ┌──────────────▼───────────────┐                           │
//! │  │ VisitOracle (ground truth)   │                           │
//! │  └──────────────────────────────┘                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use lightbulb_sim::{BatchRunner, StrategyId};
//! use lightbulb_core::ProtocolConfig;
//!
//! let runner = BatchRunner::new(42, ProtocolConfig::default());
//! let summary = runner.run(StrategyId::Era, 10)?;
//! println!("{:.0} steps on average", summary.mean_steps);
//! ```

mod concurrent;
mod context;
mod exporter;
mod oracle;
mod runner;
pub mod strategies;

pub use concurrent::run_concurrent;
pub use context::{protocol_seed, ScriptedContext, SimContext};
pub use exporter::{BatchExport, RunExport, SimExport};
pub use oracle::VisitOracle;
pub use runner::{BatchRunner, BatchSummary, RunOutcome, Simulation};
pub use strategies::{StrategyId, StrategyParams};
