//! Era scheduler for the adaptive counter.
//!
//! An era is a window of steps in which a lit signal is worth a fixed
//! increment `k`. Eras are keyed only by elapsed step count, are contiguous,
//! and the last one is open-ended with `k = 1` so any leftover credit can
//! always be reported exactly.
//!
//! # Standard table
//!
//! ```text
//! steps        k   mode         load rule
//! [0, 500)     1   accumulate   -
//! [500, 1000)  2   accumulate   release
//! [1000, 1500) 4   accumulate   release
//! [1500, 2500) 8   count        release
//! [2500, 3500) 4   count        carry
//! [3500, 4000) 2   count        carry
//! [4000, ..)   1   count        carry
//! ```
//!
//! Accumulate eras let agents merge equal holdings into larger powers of two;
//! count eras only ship holdings to the coordinator.
//!
//! # Hand-off
//!
//! A signal lit in era `i` is worth `k_i`. If it is still lit when era `i + 1`
//! begins, the first agent activated converts it before anything else
//! happens, using the new era's [`LoadRule`]. The conversion always uses the
//! previous era's increment as recorded in the table, so no era can read a
//! stale signal at the wrong denomination.

use crate::error::{ProtocolError, Result};
use serde::{Deserialize, Serialize};

/// What agents do with a lit signal during an era.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EraMode {
    /// An agent holding exactly `k` picks a lit signal up (now holding `2k`)
    Accumulate,
    
    /// Only the coordinator takes a lit signal down
    Count,
}

/// How a signal left lit by the previous era is converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadRule {
    /// The first agent activated takes the whole old worth; signal cleared
    Release,
    
    /// Keep the signal lit at the new worth when the old worth covers it,
    /// handing only the difference to the first agent; otherwise release
    Carry,
}

/// Result of converting a lit signal across an era boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandOff {
    /// Whether the signal stays lit (now worth the new increment)
    pub stays_lit: bool,
    
    /// Units handed to the first agent activated in the new era
    pub released: u64,
}

impl LoadRule {
    /// Converts a signal worth `previous` (if lit) into an era worth `next`.
    ///
    /// `released + (stays_lit ? next : 0)` always equals the old worth.
    pub fn convert(&self, lit: bool, previous: u64, next: u64) -> HandOff {
        if !lit {
            return HandOff { stays_lit: false, released: 0 };
        }
        match self {
            LoadRule::Carry if next <= previous => HandOff {
                stays_lit: true,
                released: previous - next,
            },
            _ => HandOff {
                stays_lit: false,
                released: previous,
            },
        }
    }
}

/// One phase of the adaptive counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Era {
    /// First step (0-based elapsed count) belonging to this era
    pub starts_at: u64,
    
    /// Units a lit signal is worth during this era
    pub increment: u64,
    
    /// Behaviour of ordinary agents
    pub mode: EraMode,
    
    /// Conversion applied when this era begins (ignored for the first era)
    pub load: LoadRule,
}

impl Era {
    /// Creates an era.
    pub fn new(starts_at: u64, increment: u64, mode: EraMode, load: LoadRule) -> Self {
        Self {
            starts_at,
            increment,
            mode,
            load,
        }
    }
}

/// Ordered, contiguous, open-ended sequence of eras.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Era>", into = "Vec<Era>")]
pub struct EraTable {
    eras: Vec<Era>,
}

impl EraTable {
    /// Builds a table, rejecting anything that is not contiguous, exhaustive
    /// and terminated by an increment-1 era.
    pub fn new(eras: Vec<Era>) -> Result<Self> {
        let first = eras
            .first()
            .ok_or_else(|| ProtocolError::invalid("era table is empty"))?;
        if first.starts_at != 0 {
            return Err(ProtocolError::invalid(format!(
                "first era starts at step {}, expected 0",
                first.starts_at
            )));
        }
        
        for (index, era) in eras.iter().enumerate() {
            if era.increment == 0 {
                return Err(ProtocolError::invalid(format!("era {} has increment 0", index)));
            }
        }
        
        for (index, pair) in eras.windows(2).enumerate() {
            if pair[1].starts_at <= pair[0].starts_at {
                return Err(ProtocolError::invalid(format!(
                    "era {} starts at {} which does not follow era {} at {}",
                    index + 1,
                    pair[1].starts_at,
                    index,
                    pair[0].starts_at
                )));
            }
        }
        
        // Non-empty: checked above
        let last = eras[eras.len() - 1];
        if last.increment != 1 {
            return Err(ProtocolError::invalid(format!(
                "final era must have increment 1, found {}",
                last.increment
            )));
        }
        
        Ok(Self { eras })
    }
    
    /// The tuned seven-era table.
    pub fn standard() -> Self {
        use EraMode::{Accumulate, Count};
        use LoadRule::{Carry, Release};
        
        Self {
            eras: vec![
                Era::new(0, 1, Accumulate, Release),
                Era::new(500, 2, Accumulate, Release),
                Era::new(1000, 4, Accumulate, Release),
                Era::new(1500, 8, Count, Release),
                Era::new(2500, 4, Count, Carry),
                Era::new(3500, 2, Count, Carry),
                Era::new(4000, 1, Count, Carry),
            ],
        }
    }
    
    /// A single open-ended counting era; behaves like the naive counter.
    pub fn single() -> Self {
        Self {
            eras: vec![Era::new(0, 1, EraMode::Count, LoadRule::Release)],
        }
    }
    
    /// Index of the era active after `elapsed` completed steps.
    pub fn index_at(&self, elapsed: u64) -> usize {
        // partition_point counts eras with starts_at <= elapsed; era 0 always does
        self.eras
            .partition_point(|era| era.starts_at <= elapsed)
            .saturating_sub(1)
    }
    
    /// Era at `index`. Indices come from [`EraTable::index_at`].
    pub fn era(&self, index: usize) -> &Era {
        &self.eras[index.min(self.eras.len() - 1)]
    }
    
    /// All eras in order.
    pub fn eras(&self) -> &[Era] {
        &self.eras
    }
    
    /// Number of eras.
    pub fn len(&self) -> usize {
        self.eras.len()
    }
    
    /// Always false for a validated table.
    pub fn is_empty(&self) -> bool {
        self.eras.is_empty()
    }
}

impl Default for EraTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<Era>> for EraTable {
    type Error = ProtocolError;
    
    fn try_from(eras: Vec<Era>) -> Result<Self> {
        Self::new(eras)
    }
}

impl From<EraTable> for Vec<Era> {
    fn from(table: EraTable) -> Self {
        table.eras
    }
}
