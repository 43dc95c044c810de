//! Serialized access to the signal for concurrent callers.
//!
//! In the sequential driver no locking is needed: one agent acts per step by
//! construction. Once agents run as independent tasks, the read-act-write
//! sequence of a turn must be atomic with respect to every other agent, or
//! the one-bit channel stops being one bit. `SharedRoom` holds the signal and
//! the protocol state behind a single `tokio::sync::Mutex`, held for exactly
//! one turn.

use crate::signal::SharedSignal;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Everything an agent may touch during its turn.
struct RoomState<S> {
    signal: SharedSignal,
    occupant_state: S,
    turns: u64,
}

/// The room agents visit one at a time.
///
/// `S` is the protocol state shared by all agents (a strategy instance).
pub struct SharedRoom<S> {
    inner: Arc<Mutex<RoomState<S>>>,
}

impl<S> Clone for SharedRoom<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Send> SharedRoom<S> {
    /// Creates a room with an unlit signal.
    pub fn new(occupant_state: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RoomState {
                signal: SharedSignal::new(),
                occupant_state,
                turns: 0,
            })),
        }
    }
    
    /// Runs one agent's turn with exclusive access to the signal and state.
    ///
    /// The lock is held for the whole closure, so no other visit can observe
    /// a half-finished turn.
    pub async fn visit<F, R>(&self, turn: F) -> R
    where
        F: FnOnce(&mut SharedSignal, &mut S) -> R,
    {
        let mut room = self.inner.lock().await;
        room.turns += 1;
        let RoomState { signal, occupant_state, .. } = &mut *room;
        turn(signal, occupant_state)
    }
    
    /// Returns the number of completed turns.
    pub async fn turns(&self) -> u64 {
        self.inner.lock().await.turns
    }
    
    /// Returns a snapshot of the signal.
    pub async fn signal(&self) -> SharedSignal {
        self.inner.lock().await.signal.clone()
    }
}
