//! Remote Object Factory
//!
//! Constructing a remote entity is an asynchronous exchange like any other:
//! the factory mints a request id and a target id, registers the completion
//! sink under the request id, injects the construction envelope, and hands
//! back a still-pending [`RemoteHandle`] immediately. The sink is registered
//! *before* the message is sent, so a reply can never arrive for an id the
//! registry does not know.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use jsbridge_common::{CorrelationId, OutboundEnvelope, OutboundMessage, Result};

use crate::codec::{Arg, Codec};
use crate::handle::RemoteHandle;
use crate::registry::CallbackRegistry;
use crate::transport::OutboundTransport;

pub struct ObjectFactory {
    registry: Arc<CallbackRegistry>,
    transport: Arc<dyn OutboundTransport>,
    construct_function: String,
    handle_timeout: Option<Duration>,
}

impl ObjectFactory {
    pub(crate) fn new(
        registry: Arc<CallbackRegistry>,
        transport: Arc<dyn OutboundTransport>,
        construct_function: String,
        handle_timeout: Option<Duration>,
    ) -> Self {
        ObjectFactory {
            registry,
            transport,
            construct_function,
            handle_timeout,
        }
    }

    /// Requests construction of a remote entity of class `class_name`.
    ///
    /// Returns the handle in pending state; it resolves when the runtime
    /// reports completion on the construction channel. Encoding errors in the
    /// constructor arguments surface here, synchronously, before anything is
    /// registered or transmitted.
    pub fn construct(&self, class_name: &str, ctor_args: Vec<Arg>) -> Result<RemoteHandle> {
        let target_id = CorrelationId::mint();

        let codec = Codec::new(&self.registry, self.handle_timeout);
        let mut params = vec![
            Value::String(class_name.to_string()),
            Value::String(target_id.to_string()),
        ];
        for arg in ctor_args {
            params.push(codec.encode(arg)?);
        }

        let handle = RemoteHandle::pending();
        let resolver = handle.clone();
        let request_id = self.registry.register_one_shot(Box::new(move |params| {
            match params.into_iter().next() {
                Some(Value::String(raw)) => match raw.parse::<CorrelationId>() {
                    Ok(id) => {
                        resolver.resolve(id);
                    }
                    Err(e) => {
                        tracing::error!("Construction completion carried a bad target id: {}", e)
                    }
                },
                other => tracing::error!(
                    "Construction completion missing its target id, got: {:?}",
                    other
                ),
            }
        }));

        let message = OutboundMessage::new(
            self.construct_function.clone(),
            OutboundEnvelope {
                params,
                request_id: Some(request_id),
            },
        );

        if let Err(e) = self.transport.inject(&message) {
            // Nothing will ever complete this exchange; drop the entry.
            self.registry.remove(&request_id);
            return Err(e);
        }

        tracing::debug!(
            "Construction of {} requested: request id {}, target id {}",
            class_name,
            request_id,
            target_id
        );
        Ok(handle)
    }
}
