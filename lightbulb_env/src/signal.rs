//! The shared one-bit channel.

use serde::{Deserialize, Serialize};

/// The single boolean every agent communicates through.
///
/// Exactly one agent reads and writes it per step; the value persists
/// unchanged between steps. It starts unlit.
///
/// The signal is passed explicitly to whichever agent is active rather than
/// living in a global, so the single-writer-per-step discipline is visible
/// in every signature that touches it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedSignal {
    /// Current value
    lit: bool,
    
    /// Number of writes that changed the value (diagnostics only)
    transitions: u64,
}

impl SharedSignal {
    /// Creates an unlit signal.
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Reads the current value.
    pub fn read(&self) -> bool {
        self.lit
    }
    
    /// Writes a value. Writing the current value again is a no-op.
    pub fn write(&mut self, lit: bool) {
        if self.lit != lit {
            self.transitions += 1;
        }
        self.lit = lit;
    }
    
    /// Returns how many writes actually flipped the value.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }
}
