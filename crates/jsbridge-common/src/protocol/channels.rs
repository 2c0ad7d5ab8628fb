//! Channel naming
//!
//! The embedded runtime surfaces inbound messages on three logical channels,
//! each identified by an (invoke-name, cancel-name) pair agreed with the
//! runtime. Outbound traffic enters the runtime through two named entry
//! functions. The names themselves are configuration; nothing in the bridge
//! depends on their spelling.

/// An (invoke-name, cancel-name) pair identifying one inbound channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelName {
    /// Name under which the runtime delivers messages
    pub invoke: String,
    /// Name under which the runtime withdraws the channel
    pub cancel: String,
}

impl ChannelName {
    pub fn new(invoke: impl Into<String>, cancel: impl Into<String>) -> Self {
        ChannelName {
            invoke: invoke.into(),
            cancel: cancel.into(),
        }
    }
}

/// The full set of channel and entry-function names for one bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSet {
    /// Callback-invocation channel (ids arrive under `callbackId`)
    pub callback: ChannelName,
    /// Object-construction-return channel (ids arrive under `requestId`)
    pub construction: ChannelName,
    /// Call-return-value channel (ids arrive under `callbackId`)
    pub call_return: ChannelName,
    /// Remote entry function receiving method-call envelopes
    pub invoke_function: String,
    /// Remote entry function receiving construction envelopes
    pub construct_function: String,
}

impl Default for ChannelSet {
    fn default() -> Self {
        ChannelSet {
            callback: ChannelName::new("callbackInvoked", "callbackCanceled"),
            construction: ChannelName::new("objectConstructed", "constructionCanceled"),
            call_return: ChannelName::new("callReturned", "callReturnCanceled"),
            invoke_function: "bridgeInvoke".to_string(),
            construct_function: "bridgeConstruct".to_string(),
        }
    }
}
