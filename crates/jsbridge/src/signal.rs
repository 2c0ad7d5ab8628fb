//! Write-once completion cell.
//!
//! The bridge exposes exactly two operations that may block a calling thread:
//! waiting for a remote handle's id and waiting for a pending call result.
//! Both sit on this cell, which blocks on a one-time signal and never on a
//! lock held across I/O.

use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

use jsbridge_common::{BridgeError, Result};

struct State<T> {
    value: Option<T>,
    completed: bool,
}

/// A latch holding at most one value, completed at most once.
///
/// All waiters unblock together on the single completion. Repeated
/// completions are rejected, which is how the pending-to-resolved transition
/// of a handle stays one-way.
pub(crate) struct SignalCell<T> {
    state: Mutex<State<T>>,
    ready: Condvar,
}

impl<T> SignalCell<T> {
    pub(crate) fn new() -> Self {
        SignalCell {
            state: Mutex::new(State {
                value: None,
                completed: false,
            }),
            ready: Condvar::new(),
        }
    }

    /// Completes the cell. Returns `true` if this was the first completion;
    /// later completions leave the stored value untouched.
    pub(crate) fn complete(&self, value: T) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.completed {
            return false;
        }
        state.value = Some(value);
        state.completed = true;
        drop(state);
        self.ready.notify_all();
        true
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.state.lock().unwrap().completed
    }

    /// Blocks until the cell completes, then returns a copy of the value.
    pub(crate) fn wait(&self) -> T
    where
        T: Clone,
    {
        let mut state = self.state.lock().unwrap();
        while !state.completed {
            state = self.ready.wait(state).unwrap();
        }
        state.value.clone().expect("completed cell holds a value")
    }

    /// Bounded wait; `BridgeError::Timeout` once the deadline passes.
    pub(crate) fn wait_timeout(&self, timeout: Duration) -> Result<T>
    where
        T: Clone,
    {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock().unwrap();
        while !state.completed {
            let now = Instant::now();
            if now >= deadline {
                return Err(BridgeError::Timeout(timeout.as_millis() as u64));
            }
            let (next, _) = self.ready.wait_timeout(state, deadline - now).unwrap();
            state = next;
        }
        Ok(state.value.clone().expect("completed cell holds a value"))
    }

    pub(crate) fn try_get(&self) -> Option<T>
    where
        T: Clone,
    {
        let state = self.state.lock().unwrap();
        if state.completed {
            state.value.clone()
        } else {
            None
        }
    }

    /// Blocks until completion, then moves the value out.
    pub(crate) fn take_wait(&self) -> T {
        let mut state = self.state.lock().unwrap();
        while !state.completed {
            state = self.ready.wait(state).unwrap();
        }
        state.value.take().expect("completion value taken twice")
    }

    /// Bounded [`take_wait`](Self::take_wait).
    pub(crate) fn take_timeout(&self, timeout: Duration) -> Result<T> {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock().unwrap();
        while !state.completed {
            let now = Instant::now();
            if now >= deadline {
                return Err(BridgeError::Timeout(timeout.as_millis() as u64));
            }
            let (next, _) = self.ready.wait_timeout(state, deadline - now).unwrap();
            state = next;
        }
        Ok(state.value.take().expect("completion value taken twice"))
    }
}
