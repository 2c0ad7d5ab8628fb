//! Inbound Dispatcher
//!
//! The embedded runtime surfaces inbound messages on a single dedicated
//! delivery thread that must return promptly. The dispatcher is that thread's
//! only host-side code path: it decodes the body, looks the id up in the
//! registry, hands the sink to a freshly spawned worker, and immediately
//! returns the channel acknowledgment. Host logic never runs on the delivery
//! thread - a sink may itself issue further calls and block on their ids,
//! which on the delivery thread would deadlock the whole bridge.
//!
//! Failures detected here - an unparsable body, an unknown id, a parameter
//! count that does not match the sink's shape - are contained: logged,
//! answered with [`Ack::Failure`], and dropped. Nothing escapes that could
//! tear down the delivery thread or the runtime connection.

use std::sync::Arc;
use std::thread;

use serde_json::Value;

use jsbridge_common::{Ack, BridgeError, CallbackBody, ConstructionBody, CorrelationId};

use crate::registry::{CallbackRegistry, Firing, RegistrationKind};

/// Single consumer of the runtime's three inbound delivery channels.
pub struct Dispatcher {
    registry: Arc<CallbackRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<CallbackRegistry>) -> Self {
        Dispatcher { registry }
    }

    /// Entry point for the callback-invocation channel.
    pub fn on_callback_invoked(&self, body: &str) -> Ack {
        match CallbackBody::parse(body) {
            Ok(message) => self.deliver("callback", message.callback_id, message.params),
            Err(e) => {
                tracing::warn!("Undecodable body on callback channel: {}", e);
                Ack::Failure
            }
        }
    }

    /// Entry point for the call-return-value channel.
    pub fn on_call_returned(&self, body: &str) -> Ack {
        match CallbackBody::parse(body) {
            Ok(message) => self.deliver("call-return", message.callback_id, message.params),
            Err(e) => {
                tracing::warn!("Undecodable body on call-return channel: {}", e);
                Ack::Failure
            }
        }
    }

    /// Entry point for the object-construction-return channel.
    pub fn on_construction_completed(&self, body: &str) -> Ack {
        match ConstructionBody::parse(body) {
            Ok(message) => self.deliver(
                "construction",
                message.request_id,
                vec![Value::String(message.param)],
            ),
            Err(e) => {
                tracing::warn!("Undecodable body on construction channel: {}", e);
                Ack::Failure
            }
        }
    }

    /// Shared delivery path: lookup, arity check, worker hand-off.
    ///
    /// The arity check runs here, before the registry entry is touched, so a
    /// malformed message neither consumes a one-shot registration nor earns a
    /// positive ack.
    fn deliver(&self, channel: &'static str, id: CorrelationId, params: Vec<Value>) -> Ack {
        let kind = match self.registry.get(&id) {
            Some(kind) => kind,
            None => {
                tracing::warn!(
                    "{} message for unregistered id {}, answering negatively",
                    channel,
                    id
                );
                return Ack::Failure;
            }
        };

        if let Err(e) = check_arity(kind, params.len()) {
            tracing::warn!("{} message for id {} rejected: {}", channel, id, e);
            return Ack::Failure;
        }

        let firing = match self.registry.resolve(&id) {
            Some(firing) => firing,
            // Raced with another delivery of the same one-shot id.
            None => {
                tracing::warn!(
                    "{} registration for id {} vanished before dispatch",
                    channel,
                    id
                );
                return Ack::Failure;
            }
        };

        tracing::debug!("Dispatching {} message for id {} to a worker", channel, id);
        match spawn_worker(id, firing, params) {
            Ok(()) => Ack::Success,
            Err(e) => {
                tracing::error!("Failed to spawn worker for id {}: {}", id, e);
                Ack::Failure
            }
        }
    }
}

fn check_arity(kind: RegistrationKind, got: usize) -> Result<(), BridgeError> {
    let expected = match kind {
        RegistrationKind::PersistentNoArg => 0,
        RegistrationKind::OneShot | RegistrationKind::PersistentOneArg => 1,
    };
    let ok = match kind {
        // A one-shot completion may carry no payload at all.
        RegistrationKind::OneShot => got <= 1,
        RegistrationKind::PersistentNoArg => got == 0,
        RegistrationKind::PersistentOneArg => got == 1,
    };
    if ok {
        Ok(())
    } else {
        Err(BridgeError::Arity { expected, got })
    }
}

/// The only place in the bridge that spawns workers. The delivery thread
/// returns as soon as the spawn succeeds; it never joins the worker.
fn spawn_worker(
    id: CorrelationId,
    firing: Firing,
    params: Vec<Value>,
) -> std::io::Result<()> {
    thread::Builder::new()
        .name(format!("bridge-worker-{}", id))
        .spawn(move || {
            if let Err(e) = firing.run(params) {
                tracing::error!("Uncaught error in bridge worker for id {}: {}", id, e);
            }
        })
        .map(|_| ())
}
