//! Lightbulb Environment Abstraction Layer
//!
//! This crate provides the pieces every coordination protocol shares with its
//! environment, independent of which protocol is running:
//! - **The channel**: a single [`SharedSignal`] bit, the only way agents talk
//! - **The schedule**: a [`SimulationContext`] that picks which agent is active
//! - **The room**: a [`SharedRoom`] that serializes turns for concurrent callers
//!
//! By deriving the schedule from a single 64-bit seed, any protocol bug
//! becomes reproducible via its seed number.
//!
//! # Example
//!
//! ```ignore
//! use lightbulb_env::{AgentId, SharedSignal, SimulationContext};
//!
//! fn step<Ctx: SimulationContext>(ctx: &mut Ctx, signal: &mut SharedSignal) {
//!     let agent = ctx.pick_agent(100);
//!     if !signal.read() && agent != AgentId::new(1) {
//!         signal.write(true);
//!     }
//! }
//! ```

mod context;
mod error;
mod room;
mod signal;
mod types;

pub use context::{EntropyContext, SimulationContext};
pub use error::EnvError;
pub use room::SharedRoom;
pub use signal::SharedSignal;
pub use types::AgentId;
