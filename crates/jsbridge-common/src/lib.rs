//! jsbridge Protocol Types
//!
//! This crate provides the core protocol definitions shared by the host-side
//! bridge and any embedding that carries its messages into an embedded
//! scripting runtime.
//!
//! # Overview
//!
//! jsbridge lets a host process drive objects that live inside an embedded
//! scripting runtime reachable only through an asynchronous, string-based
//! message channel. This crate contains the wire-level vocabulary for that
//! exchange:
//!
//! - **Correlation ids**: opaque 128-bit identifiers minted per outstanding
//!   exchange
//! - **Envelopes**: the inbound and outbound message bodies, and the single
//!   injection string handed to the runtime
//! - **Wire references**: the `{type, value}` records representing remote
//!   objects and registered host callbacks
//! - **Channels**: the named inbound delivery channels and outbound entry
//!   functions agreed with the runtime
//! - **Errors**: the bridge-wide error taxonomy
//!
//! # Wire Format
//!
//! - **Serialization**: JSON
//! - **Outbound**: a single string, `function({"params": [...], "requestId": "..."})`,
//!   with `requestId` present only when a reply is expected
//! - **Inbound**: `{"callbackId": "<id>", "params": [...]}` on the callback
//!   and call-return channels, `{"requestId": "<id>", "param": "<id>"}` on the
//!   construction channel

pub mod protocol;

pub use protocol::*;
