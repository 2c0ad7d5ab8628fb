//! Pending call results
//!
//! A [`PendingResult`] is the caller's side of one outstanding call: a typed
//! one-shot future completed by the inbound dispatcher when the matching
//! reply arrives. Per outstanding call the state machine is Sent then
//! Completed; there is no cancellation, and a reply that never arrives is
//! surfaced as a timeout by the bounded accessors.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use jsbridge_common::{BridgeError, Result};

use crate::signal::SignalCell;

/// The eventually-decoded result of a call that expects a reply.
///
/// Obtaining the value consumes the `PendingResult`; the completion is
/// delivered exactly once.
pub struct PendingResult<T> {
    cell: Arc<SignalCell<Result<T>>>,
    default_timeout: Option<Duration>,
}

impl<T> PendingResult<T>
where
    T: DeserializeOwned + Send + 'static,
{
    /// Creates the pending side and the completion sink that will decode the
    /// reply payload into `T`.
    pub(crate) fn new(
        default_timeout: Option<Duration>,
    ) -> (Self, Box<dyn FnOnce(Vec<Value>) + Send + 'static>) {
        let cell = Arc::new(SignalCell::new());
        let completer = Arc::clone(&cell);
        let sink = Box::new(move |params: Vec<Value>| {
            let payload = params.into_iter().next().unwrap_or(Value::Null);
            let outcome = serde_json::from_value::<T>(payload).map_err(BridgeError::from);
            completer.complete(outcome);
        });
        (
            PendingResult {
                cell,
                default_timeout,
            },
            sink,
        )
    }

    /// Waits for the decoded result, bounded by the bridge's configured
    /// call timeout (unbounded when the bridge was configured without one).
    pub fn get(self) -> Result<T> {
        match self.default_timeout {
            Some(timeout) => self.cell.take_timeout(timeout)?,
            None => self.cell.take_wait(),
        }
    }

    /// Waits with an explicit bound.
    pub fn get_within(self, timeout: Duration) -> Result<T> {
        self.cell.take_timeout(timeout)?
    }

    /// Waits without any bound; a reply that never arrives blocks forever.
    pub fn get_blocking(self) -> Result<T> {
        self.cell.take_wait()
    }

    /// Whether the reply has already arrived.
    pub fn is_complete(&self) -> bool {
        self.cell.is_complete()
    }
}
