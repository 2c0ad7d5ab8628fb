//! jsbridge - a bridge between host code and an embedded scripting runtime.
//!
//! The entities application code manipulates live inside an embedded
//! scripting runtime reachable only through an asynchronous, string-based
//! message channel. This crate is the bridge across that channel: it lets the
//! host invoke remote functions and methods, construct and address remote
//! objects by opaque handles, and register host-side callbacks the runtime
//! may fire at arbitrary times - correlating every exchange and never
//! occupying the runtime's single delivery thread with host logic.
//!
//! # Architecture
//!
//! ```text
//! application code
//!       |                         embedded runtime
//!   [Bridge] --(inject)--> [OutboundTransport] ----> entry functions
//!       |                                                  |
//!   [CallbackRegistry] <--- [Dispatcher] <--- delivery thread (3 channels)
//!       |                        |
//!   one-shot / persistent     fresh worker thread per firing
//! ```
//!
//! - [`Bridge`] - the facade: `call`, `call_no_result`, `construct`,
//!   `register_runnable` / `register_consumer`
//! - [`CallbackRegistry`] - mutex-guarded store correlating ids to sinks
//! - [`Dispatcher`] - sole consumer of the three inbound channels; spawns a
//!   worker per firing and answers each message with an acknowledgment
//! - [`RemoteHandle`] / [`PendingResult`] - the two blocking points, both
//!   waiting on a one-time signal
//! - [`Codec`] / [`Arg`] - declared-type-directed encoding of arguments
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use jsbridge::{Arg, Bridge, OutboundTransport};
//! use jsbridge_common::{OutboundMessage, Result};
//!
//! struct MyRuntime;
//! impl OutboundTransport for MyRuntime {
//!     fn inject(&self, message: &OutboundMessage) -> Result<()> {
//!         // hand message.injection_string()? to the embedded runtime
//!         Ok(())
//!     }
//! }
//!
//! # fn run() -> Result<()> {
//! let bridge = Bridge::with_defaults(Arc::new(MyRuntime));
//! let marker = bridge.construct("Marker", vec![Arg::json(serde_json::json!({
//!     "position": {"lat": 47.6, "lng": -122.3}
//! }))?])?;
//! bridge.call_no_result(&marker, "setVisible", vec![Arg::json(true)?])?;
//! # Ok(())
//! # }
//! ```

mod signal;

pub mod bridge;
pub mod codec;
pub mod dispatcher;
pub mod factory;
pub mod handle;
pub mod pending;
pub mod registry;
pub mod transport;

pub use bridge::{handle_ref, Bridge, BridgeConfig, Target};
pub use codec::{decode, decode_id, Arg, Codec};
pub use dispatcher::Dispatcher;
pub use factory::ObjectFactory;
pub use handle::RemoteHandle;
pub use pending::PendingResult;
pub use registry::{
    CallbackRegistry, ConsumerSink, Firing, OneShotSink, PersistentSink, RegistrationKind,
    RunnableSink,
};
pub use transport::OutboundTransport;

pub use jsbridge_common::{
    Ack, BridgeError, ChannelName, ChannelSet, CorrelationId, OutboundEnvelope, OutboundMessage,
    Result, WireRef, WireTag,
};
