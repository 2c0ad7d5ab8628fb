pub mod channels;
pub mod envelope;
pub mod error;
pub mod id;
pub mod wire;

pub use channels::{ChannelName, ChannelSet};
pub use envelope::{Ack, CallbackBody, ConstructionBody, OutboundEnvelope, OutboundMessage};
pub use error::{BridgeError, Result};
pub use id::CorrelationId;
pub use wire::{WireRef, WireTag};
