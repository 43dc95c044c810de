//! Lightbulb Core - Coordination Over a Single Shared Bit
//!
//! N agents share one boolean signal. Each step exactly one agent, chosen
//! uniformly at random, may read and write it. One agent, the coordinator,
//! must eventually certify that every agent has been activated, and must
//! never do so early.
//!
//! This library provides the protocols:
//! 1. **Naive counter**: each agent reports once, the coordinator counts clears
//! 2. **Relay counter**: reports can be stashed and re-raised later
//! 3. **Parity counter**: step parity doubles what a lit signal is worth
//! 4. **Era counter**: an era table grows and then shrinks the worth of a lit
//!    signal, so merged holdings travel in bulk
//!
//! All four share one soundness argument: units of credit are moved, never
//! minted, so the coordinator's count can reach N - 1 only once every ordinary
//! agent has released its own unit (see [`ledger`]).

pub mod config;
pub mod era;
pub mod era_counter;
pub mod error;
pub mod ledger;
pub mod naive;
pub mod parity;
pub mod relay;
pub mod strategy;

// Re-export key types for convenience
pub use config::ProtocolConfig;
pub use era::{Era, EraMode, EraTable, HandOff, LoadRule};
pub use era_counter::EraCounter;
pub use error::{ProtocolError, Result};
pub use ledger::CreditLedger;
pub use naive::NaiveCounter;
pub use parity::ParityCounter;
pub use relay::{RelayCounter, DEFAULT_STASH_PROBABILITY};
pub use strategy::Strategy;
