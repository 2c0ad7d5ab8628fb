//! Outbound transport seam
//!
//! The bridge never talks to the runtime directly; the embedding supplies
//! the one-directional channel that injects rendered messages. Injection
//! itself needs no acknowledgment - acknowledgment only flows on the three
//! inbound channels handled by the dispatcher.

use jsbridge_common::{OutboundMessage, Result};

/// One-directional channel injecting messages into the embedded runtime.
///
/// Implementations must tolerate concurrent injection from any number of
/// host threads, and must never call back synchronously into the dispatcher:
/// the inbound and outbound directions are independent by design.
pub trait OutboundTransport: Send + Sync {
    fn inject(&self, message: &OutboundMessage) -> Result<()>;
}

impl<T: OutboundTransport + ?Sized> OutboundTransport for std::sync::Arc<T> {
    fn inject(&self, message: &OutboundMessage) -> Result<()> {
        (**self).inject(message)
    }
}
