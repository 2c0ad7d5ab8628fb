//! Bridge facade
//!
//! [`Bridge`] ties the pieces together and exposes the four primitives
//! application code consumes: call with a result, call with no result,
//! register a host callback, and construct a remote object. The embedding
//! wires the runtime's delivery thread to [`Bridge::dispatcher`] and supplies
//! the outbound injection channel as an [`OutboundTransport`].

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use jsbridge_common::{
    ChannelSet, CorrelationId, OutboundEnvelope, OutboundMessage, Result, WireRef,
};

use crate::codec::{Arg, Codec};
use crate::dispatcher::Dispatcher;
use crate::factory::ObjectFactory;
use crate::handle::RemoteHandle;
use crate::pending::PendingResult;
use crate::registry::{CallbackRegistry, PersistentSink};
use crate::transport::OutboundTransport;

/// Bridge-wide configuration.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Channel and entry-function names agreed with the runtime
    pub channels: ChannelSet,
    /// Default bound on waiting for replies and handle resolution.
    /// `None` restores the unbounded wait of exchanges that never time out.
    pub call_timeout: Option<Duration>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        // A reply that never arrives would otherwise block its waiter
        // forever; 30 seconds is far beyond any healthy runtime round-trip.
        BridgeConfig {
            channels: ChannelSet::default(),
            call_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl BridgeConfig {
    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_channels(mut self, channels: ChannelSet) -> Self {
        self.channels = channels;
        self
    }
}

/// Addressee of an outbound call.
#[derive(Debug, Clone)]
pub enum Target {
    /// The runtime's global scope
    Runtime,
    /// A named global object inside the runtime
    Global(String),
    /// A remote entity addressed by its handle
    Object(RemoteHandle),
}

impl From<&RemoteHandle> for Target {
    fn from(handle: &RemoteHandle) -> Self {
        Target::Object(handle.clone())
    }
}

impl From<RemoteHandle> for Target {
    fn from(handle: RemoteHandle) -> Self {
        Target::Object(handle)
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Target::Global(name.to_string())
    }
}

/// The bridge between host code and one embedded runtime instance.
pub struct Bridge {
    registry: Arc<CallbackRegistry>,
    transport: Arc<dyn OutboundTransport>,
    dispatcher: Dispatcher,
    factory: ObjectFactory,
    config: BridgeConfig,
}

impl Bridge {
    pub fn new(transport: Arc<dyn OutboundTransport>, config: BridgeConfig) -> Self {
        let registry = Arc::new(CallbackRegistry::new());
        let dispatcher = Dispatcher::new(Arc::clone(&registry));
        let factory = ObjectFactory::new(
            Arc::clone(&registry),
            Arc::clone(&transport),
            config.channels.construct_function.clone(),
            config.call_timeout,
        );
        Bridge {
            registry,
            transport,
            dispatcher,
            factory,
            config,
        }
    }

    pub fn with_defaults(transport: Arc<dyn OutboundTransport>) -> Self {
        Self::new(transport, BridgeConfig::default())
    }

    /// Invokes `method` on `target` and returns the pending, eventually
    /// decoded result.
    ///
    /// The one-shot completion entry is registered before the message is
    /// injected, so a reply can never race past its registration. Encoding
    /// errors surface synchronously, before anything is transmitted.
    pub fn call<T>(
        &self,
        target: impl Into<Target>,
        method: &str,
        args: Vec<Arg>,
    ) -> Result<PendingResult<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let params = self.encode_invocation(target.into(), method, args)?;

        let (pending, sink) = PendingResult::new(self.config.call_timeout);
        let request_id = self.registry.register_one_shot(sink);

        let message = OutboundMessage::new(
            self.config.channels.invoke_function.clone(),
            OutboundEnvelope {
                params,
                request_id: Some(request_id),
            },
        );

        if let Err(e) = self.transport.inject(&message) {
            self.registry.remove(&request_id);
            return Err(e);
        }

        tracing::debug!("Call to {} sent with request id {}", method, request_id);
        Ok(pending)
    }

    /// Invokes `method` on `target`, expecting no reply. No correlation id is
    /// allocated and nothing is registered.
    pub fn call_no_result(
        &self,
        target: impl Into<Target>,
        method: &str,
        args: Vec<Arg>,
    ) -> Result<()> {
        let params = self.encode_invocation(target.into(), method, args)?;

        let message = OutboundMessage::new(
            self.config.channels.invoke_function.clone(),
            OutboundEnvelope {
                params,
                request_id: None,
            },
        );
        self.transport.inject(&message)
    }

    /// Constructs a remote entity; see [`ObjectFactory::construct`].
    pub fn construct(&self, class_name: &str, ctor_args: Vec<Arg>) -> Result<RemoteHandle> {
        self.factory.construct(class_name, ctor_args)
    }

    /// Registers a persistent no-argument host callback directly, outside an
    /// argument list, and returns its id for hand-off to the runtime.
    pub fn register_runnable(&self, f: impl Fn() + Send + Sync + 'static) -> CorrelationId {
        self.registry
            .register_persistent(PersistentSink::Runnable(Arc::new(f)))
    }

    /// Registers a persistent one-argument host callback directly and returns
    /// its id.
    pub fn register_consumer(
        &self,
        f: impl Fn(Value) + Send + Sync + 'static,
    ) -> CorrelationId {
        self.registry
            .register_persistent(PersistentSink::Consumer(Arc::new(f)))
    }

    /// Entry points for the runtime's delivery thread.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// The correlation registry, exposed for observability.
    pub fn registry(&self) -> &CallbackRegistry {
        &self.registry
    }

    pub fn channels(&self) -> &ChannelSet {
        &self.config.channels
    }

    /// Tears the bridge down: every registration, persistent ones included,
    /// is dropped. Outstanding waiters keep waiting until their own timeout.
    pub fn teardown(&self) {
        tracing::debug!("Bridge teardown, dropping {} registrations", self.registry.len());
        self.registry.clear();
    }

    fn encode_invocation(&self, target: Target, method: &str, args: Vec<Arg>) -> Result<Vec<Value>> {
        let codec = Codec::new(&self.registry, self.config.call_timeout);

        let target_node = match target {
            Target::Runtime => Value::Null,
            Target::Global(name) => Value::String(name),
            Target::Object(handle) => codec.encode(Arg::Handle(handle))?,
        };

        let mut params = vec![target_node, Value::String(method.to_string())];
        for arg in args {
            params.push(codec.encode(arg)?);
        }
        Ok(params)
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("registrations", &self.registry.len())
            .field("channels", &self.config.channels)
            .finish()
    }
}

// WireRef is re-used by wrapper layers that hand a resolved handle to the
// runtime outside a call envelope.
pub fn handle_ref(handle: &RemoteHandle, timeout: Option<Duration>) -> Result<WireRef> {
    let id = match timeout {
        Some(t) => handle.id_within(t)?,
        None => handle.id(),
    };
    Ok(WireRef::object(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingTransport {
        injected: Mutex<Vec<OutboundMessage>>,
    }

    impl RecordingTransport {
        fn new() -> Arc<Self> {
            Arc::new(RecordingTransport {
                injected: Mutex::new(Vec::new()),
            })
        }

        fn last(&self) -> OutboundMessage {
            self.injected.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl OutboundTransport for RecordingTransport {
        fn inject(&self, message: &OutboundMessage) -> Result<()> {
            self.injected.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    struct FailingTransport;

    impl OutboundTransport for FailingTransport {
        fn inject(&self, _message: &OutboundMessage) -> Result<()> {
            Err(jsbridge_common::BridgeError::Transport(
                "runtime gone".to_string(),
            ))
        }
    }

    #[test]
    fn test_call_registers_before_sending() {
        let transport = RecordingTransport::new();
        let bridge = Bridge::with_defaults(transport.clone());

        let _pending: PendingResult<Value> = bridge.call(Target::Runtime, "getCenter", vec![]).unwrap();

        assert_eq!(bridge.registry().len(), 1);
        let message = transport.last();
        assert_eq!(message.function, "bridgeInvoke");
        let id = message.envelope.request_id.expect("reply expected");
        assert!(bridge.registry().contains(&id));
    }

    #[test]
    fn test_call_no_result_allocates_nothing() {
        let transport = RecordingTransport::new();
        let bridge = Bridge::with_defaults(transport.clone());

        bridge
            .call_no_result("map", "panTo", vec![Arg::json(serde_json::json!([1, 2])).unwrap()])
            .unwrap();

        assert_eq!(bridge.registry().len(), 0);
        assert_eq!(transport.last().envelope.request_id, None);
    }

    #[test]
    fn test_failed_injection_rolls_back_the_registration() {
        let bridge = Bridge::with_defaults(Arc::new(FailingTransport));

        let result: Result<PendingResult<Value>> = bridge.call(Target::Runtime, "getZoom", vec![]);
        assert!(result.is_err());
        assert_eq!(bridge.registry().len(), 0);
    }

    #[test]
    fn test_target_encodings() {
        let transport = RecordingTransport::new();
        let bridge = Bridge::with_defaults(transport.clone());

        bridge.call_no_result(Target::Runtime, "m", vec![]).unwrap();
        assert_eq!(transport.last().envelope.params[0], Value::Null);

        bridge.call_no_result("document", "m", vec![]).unwrap();
        assert_eq!(
            transport.last().envelope.params[0],
            Value::String("document".to_string())
        );

        let id = CorrelationId::mint();
        let handle = RemoteHandle::from_id(id);
        bridge.call_no_result(&handle, "m", vec![]).unwrap();
        assert_eq!(
            transport.last().envelope.params[0],
            serde_json::json!({"type": "OBJECT", "value": id.to_string()})
        );
    }

    #[test]
    fn test_teardown_drops_persistent_registrations() {
        let transport = RecordingTransport::new();
        let bridge = Bridge::with_defaults(transport);

        bridge.register_runnable(|| {});
        bridge.register_consumer(|_| {});
        assert_eq!(bridge.registry().len(), 2);

        bridge.teardown();
        assert!(bridge.registry().is_empty());
    }
}
