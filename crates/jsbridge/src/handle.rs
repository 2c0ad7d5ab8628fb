//! Remote Handles
//!
//! A [`RemoteHandle`] is a host-side reference to an entity that exists only
//! inside the embedded runtime. It is a reference, never an owner: dropping
//! every copy says nothing about the remote entity's lifetime.
//!
//! A handle's id starts out pending and transitions to a concrete id exactly
//! once, when the runtime reports the construction complete. Copies are cheap
//! and all share the same underlying cell, so every copy observes the same
//! transition.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use jsbridge_common::{CorrelationId, Result};

use crate::signal::SignalCell;

/// Reference to a remote entity, shared by value.
#[derive(Clone)]
pub struct RemoteHandle {
    cell: Arc<SignalCell<CorrelationId>>,
}

impl RemoteHandle {
    /// A handle whose id has not resolved yet.
    pub(crate) fn pending() -> Self {
        RemoteHandle {
            cell: Arc::new(SignalCell::new()),
        }
    }

    /// A handle constructed directly from a known id; starts resolved.
    pub fn from_id(id: CorrelationId) -> Self {
        let handle = Self::pending();
        handle.cell.complete(id);
        handle
    }

    /// Marks the handle resolved. The transition happens at most once; a
    /// repeated resolution is ignored and logged.
    pub(crate) fn resolve(&self, id: CorrelationId) -> bool {
        let first = self.cell.complete(id);
        if !first {
            tracing::warn!("Ignoring repeated resolution of remote handle with id {}", id);
        }
        first
    }

    /// The remote entity's id.
    ///
    /// Blocks the calling thread until the handle resolves; once resolved,
    /// repeated calls return the same value without blocking. This is the
    /// only unbounded blocking point exposed to ordinary callers - prefer
    /// [`id_within`](Self::id_within) where a stuck construction must not
    /// hang the caller.
    pub fn id(&self) -> CorrelationId {
        self.cell.wait()
    }

    /// Bounded [`id`](Self::id); `BridgeError::Timeout` once `timeout`
    /// passes without resolution.
    pub fn id_within(&self, timeout: Duration) -> Result<CorrelationId> {
        self.cell.wait_timeout(timeout)
    }

    /// The id if already resolved, without blocking.
    pub fn try_id(&self) -> Option<CorrelationId> {
        self.cell.try_get()
    }

    pub fn is_resolved(&self) -> bool {
        self.cell.is_complete()
    }
}

impl fmt::Debug for RemoteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.try_id() {
            Some(id) => f.debug_struct("RemoteHandle").field("id", &id).finish(),
            None => f
                .debug_struct("RemoteHandle")
                .field("id", &"<pending>")
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_from_id_starts_resolved() {
        let id = CorrelationId::mint();
        let handle = RemoteHandle::from_id(id);

        assert!(handle.is_resolved());
        assert_eq!(handle.id(), id);
    }

    #[test]
    fn test_id_is_idempotent_after_resolution() {
        let handle = RemoteHandle::pending();
        let id = CorrelationId::mint();
        assert!(handle.resolve(id));

        assert_eq!(handle.id(), id);
        assert_eq!(handle.id(), id);
    }

    #[test]
    fn test_resolution_is_one_way() {
        let handle = RemoteHandle::pending();
        let first = CorrelationId::mint();

        assert!(handle.resolve(first));
        assert!(!handle.resolve(CorrelationId::mint()));
        assert_eq!(handle.id(), first);
    }

    #[test]
    fn test_copies_share_the_transition() {
        let handle = RemoteHandle::pending();
        let copy = handle.clone();
        assert!(!copy.is_resolved());

        let id = CorrelationId::mint();
        handle.resolve(id);
        assert_eq!(copy.try_id(), Some(id));
    }

    #[test]
    fn test_concurrent_waiters_unblock_together() {
        let handle = RemoteHandle::pending();
        let id = CorrelationId::mint();

        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let h = handle.clone();
                thread::spawn(move || h.id())
            })
            .collect();

        thread::sleep(Duration::from_millis(20));
        handle.resolve(id);

        for waiter in waiters {
            assert_eq!(waiter.join().unwrap(), id);
        }
    }

    #[test]
    fn test_id_within_times_out_while_pending() {
        let handle = RemoteHandle::pending();
        assert!(handle.id_within(Duration::from_millis(10)).is_err());
    }
}
