//! Type-directed Codec
//!
//! Host values cross into the runtime as JSON tree nodes. Dispatch is by the
//! declared type of the value - the [`Arg`] variant - never by inspecting the
//! payload: an inline host callback cannot report a usable runtime type, so
//! the caller names the intended interface explicitly.
//!
//! Encoding a callback value is a two-step, side-effecting operation: the
//! sink is registered first, then the freshly minted id is emitted as a
//! `{type, value}` reference. Decoding is intentionally asymmetric with
//! encoding - only the small closed set of inbound shapes (ids and scalars)
//! is supported.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use jsbridge_common::{BridgeError, CorrelationId, Result, WireRef};

use crate::handle::RemoteHandle;
use crate::registry::{CallbackRegistry, ConsumerSink, PersistentSink, RunnableSink};

/// A host value together with its declared wire type.
pub enum Arg {
    /// Scalars, arrays, and structured records - passed through as-is
    Json(Value),
    /// A remote entity, emitted as `{type: "OBJECT", value: "<id>"}`
    Handle(RemoteHandle),
    /// A no-argument host callback, registered as a side effect of encoding
    Runnable(RunnableSink),
    /// A one-argument host callback, registered as a side effect of encoding
    Consumer(ConsumerSink),
}

impl Arg {
    /// Declares a serializable host value as a plain JSON argument.
    pub fn json(value: impl Serialize) -> Result<Self> {
        serde_json::to_value(value)
            .map(Arg::Json)
            .map_err(|e| BridgeError::Encoding(format!("Value has no JSON form: {}", e)))
    }

    pub fn runnable(f: impl Fn() + Send + Sync + 'static) -> Self {
        Arg::Runnable(Arc::new(f))
    }

    pub fn consumer(f: impl Fn(Value) + Send + Sync + 'static) -> Self {
        Arg::Consumer(Arc::new(f))
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Json(value)
    }
}

impl From<RemoteHandle> for Arg {
    fn from(handle: RemoteHandle) -> Self {
        Arg::Handle(handle)
    }
}

impl From<&RemoteHandle> for Arg {
    fn from(handle: &RemoteHandle) -> Self {
        Arg::Handle(handle.clone())
    }
}

/// Encoder for outbound arguments, borrowing the registry it registers
/// callback sinks into.
pub struct Codec<'a> {
    registry: &'a CallbackRegistry,
    /// Bound on waiting for a pending handle during encoding; `None` waits
    /// indefinitely.
    handle_timeout: Option<Duration>,
}

impl<'a> Codec<'a> {
    pub fn new(registry: &'a CallbackRegistry, handle_timeout: Option<Duration>) -> Self {
        Codec {
            registry,
            handle_timeout,
        }
    }

    /// Encodes one argument into its wire node.
    ///
    /// Encoding a still-pending [`RemoteHandle`] blocks until it resolves
    /// (bounded by the configured handle timeout). Encoding a callback
    /// registers it and emits the id.
    pub fn encode(&self, arg: Arg) -> Result<Value> {
        match arg {
            Arg::Json(value) => Ok(value),
            Arg::Handle(handle) => {
                let id = self.wait_for_handle(&handle)?;
                WireRef::object(id).to_value()
            }
            Arg::Runnable(sink) => {
                let id = self.registry.register_persistent(PersistentSink::Runnable(sink));
                WireRef::runnable(id).to_value()
            }
            Arg::Consumer(sink) => {
                let id = self.registry.register_persistent(PersistentSink::Consumer(sink));
                WireRef::consumer(id).to_value()
            }
        }
    }

    fn wait_for_handle(&self, handle: &RemoteHandle) -> Result<CorrelationId> {
        match self.handle_timeout {
            Some(timeout) => handle.id_within(timeout),
            None => Ok(handle.id()),
        }
    }
}

/// Decodes a correlation id delivered as a JSON string node.
pub fn decode_id(value: &Value) -> Result<CorrelationId> {
    match value {
        Value::String(s) => s.parse(),
        other => Err(BridgeError::Encoding(format!(
            "Expected an id string, got: {}",
            other
        ))),
    }
}

/// Decodes an inbound scalar or record into `T`.
pub fn decode<T: DeserializeOwned>(value: &Value) -> Result<T> {
    Ok(serde_json::from_value(value.clone())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistrationKind;
    use serde_json::json;

    #[test]
    fn test_json_arg_passes_through() {
        let registry = CallbackRegistry::new();
        let codec = Codec::new(&registry, None);

        let node = codec.encode(Arg::json(json!({"zoom": 12})).unwrap()).unwrap();
        assert_eq!(node, json!({"zoom": 12}));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_resolved_handle_encodes_as_object_ref() {
        let registry = CallbackRegistry::new();
        let codec = Codec::new(&registry, None);
        let id = CorrelationId::mint();

        let node = codec.encode(Arg::from(RemoteHandle::from_id(id))).unwrap();
        assert_eq!(node, json!({"type": "OBJECT", "value": id.to_string()}));
    }

    #[test]
    fn test_pending_handle_encoding_respects_timeout() {
        let registry = CallbackRegistry::new();
        let codec = Codec::new(&registry, Some(Duration::from_millis(10)));
        let handle = RemoteHandle::pending();

        let result = codec.encode(Arg::from(&handle));
        assert!(matches!(result, Err(BridgeError::Timeout(_))));
    }

    #[test]
    fn test_encoding_a_runnable_registers_it() {
        let registry = CallbackRegistry::new();
        let codec = Codec::new(&registry, None);

        let node = codec.encode(Arg::runnable(|| {})).unwrap();
        assert_eq!(node["type"], "RUNNABLE");
        assert_eq!(registry.len(), 1);

        let id = decode_id(&node["value"]).unwrap();
        assert_eq!(registry.get(&id), Some(RegistrationKind::PersistentNoArg));
    }

    #[test]
    fn test_encoding_a_consumer_registers_it() {
        let registry = CallbackRegistry::new();
        let codec = Codec::new(&registry, None);

        let node = codec.encode(Arg::consumer(|_| {})).unwrap();
        assert_eq!(node["type"], "CONSUMER");

        let id = decode_id(&node["value"]).unwrap();
        assert_eq!(registry.get(&id), Some(RegistrationKind::PersistentOneArg));
    }

    #[test]
    fn test_decode_id_round_trips() {
        let id = CorrelationId::mint();
        let decoded = decode_id(&json!(id.to_string())).unwrap();
        assert_eq!(decoded, id);
    }

    #[test]
    fn test_decode_id_rejects_non_strings() {
        assert!(decode_id(&json!(42)).is_err());
        assert!(decode_id(&json!({"value": "nested"})).is_err());
    }

    #[test]
    fn test_decode_scalar() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct LatLng {
            lat: f64,
            lng: f64,
        }

        let decoded: LatLng = decode(&json!({"lat": 47.6, "lng": -122.3})).unwrap();
        assert_eq!(
            decoded,
            LatLng {
                lat: 47.6,
                lng: -122.3
            }
        );
    }
}
