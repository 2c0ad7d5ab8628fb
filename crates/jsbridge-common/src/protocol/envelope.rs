//! Message bodies
//!
//! This module defines the bodies exchanged with the embedded runtime:
//! the two inbound shapes, the outbound argument envelope, and the single
//! injection string that carries it.
//!
//! # Message Flow
//!
//! 1. The host renders an [`OutboundMessage`] and injects it into the runtime
//! 2. The runtime later surfaces an inbound body on one of its delivery
//!    channels
//! 3. The host answers every inbound body with exactly one [`Ack`] on that
//!    body's own channel
//!
//! The ack is about channel health, not about whether the payload was
//! semantically valid.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::Result;
use super::id::CorrelationId;

/// Inbound body on the callback-invocation and call-return channels.
///
/// Shape: `{"callbackId": "<id>", "params": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackBody {
    /// Correlation id of the registration this message fires
    #[serde(rename = "callbackId")]
    pub callback_id: CorrelationId,
    /// Payload parameters; most sinks expect zero or one
    #[serde(default)]
    pub params: Vec<Value>,
}

impl CallbackBody {
    pub fn new(callback_id: CorrelationId, params: Vec<Value>) -> Self {
        CallbackBody {
            callback_id,
            params,
        }
    }

    /// Parses a raw inbound body string.
    pub fn parse(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }
}

/// Inbound body on the construction channel.
///
/// Shape: `{"requestId": "<id>", "param": "<targetId>"}` - the single `param`
/// carries the id under which the freshly constructed entity is addressable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructionBody {
    /// Correlation id of the pending construction
    #[serde(rename = "requestId")]
    pub request_id: CorrelationId,
    /// Target id of the constructed entity, as a string
    pub param: String,
}

impl ConstructionBody {
    pub fn new(request_id: CorrelationId, param: impl Into<String>) -> Self {
        ConstructionBody {
            request_id,
            param: param.into(),
        }
    }

    /// Parses a raw inbound body string.
    pub fn parse(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }
}

/// Outbound argument envelope.
///
/// `requestId` is serialized only when the caller expects a reply; a
/// fire-and-forget call carries bare `params`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundEnvelope {
    /// Encoded call parameters
    pub params: Vec<Value>,
    /// Correlation id the reply must carry (present only when a reply is
    /// expected)
    #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<CorrelationId>,
}

/// A complete outbound message: the remote entry function plus its envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    /// Name of the remote function receiving the envelope
    pub function: String,
    /// The argument envelope
    pub envelope: OutboundEnvelope,
}

impl OutboundMessage {
    pub fn new(function: impl Into<String>, envelope: OutboundEnvelope) -> Self {
        OutboundMessage {
            function: function.into(),
            envelope,
        }
    }

    /// Renders the single string injected into the runtime:
    /// `function({"params": [...], "requestId": "..."})`.
    pub fn injection_string(&self) -> Result<String> {
        Ok(format!(
            "{}({})",
            self.function,
            serde_json::to_string(&self.envelope)?
        ))
    }
}

/// Channel acknowledgment for one inbound message.
///
/// Every inbound message receives exactly one of these on its own channel,
/// or that channel's liveness degrades.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ack {
    Success,
    Failure,
}

impl Ack {
    pub fn is_success(self) -> bool {
        self == Ack::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_callback_body_parses() {
        let id = CorrelationId::mint();
        let raw = format!(r#"{{"callbackId": "{}", "params": [41, "x"]}}"#, id);

        let body = CallbackBody::parse(&raw).unwrap();
        assert_eq!(body.callback_id, id);
        assert_eq!(body.params, vec![json!(41), json!("x")]);
    }

    #[test]
    fn test_callback_body_params_default_empty() {
        let id = CorrelationId::mint();
        let raw = format!(r#"{{"callbackId": "{}"}}"#, id);

        let body = CallbackBody::parse(&raw).unwrap();
        assert!(body.params.is_empty());
    }

    #[test]
    fn test_construction_body_parses() {
        let id = CorrelationId::mint();
        let raw = format!(r#"{{"requestId": "{}", "param": "T-123"}}"#, id);

        let body = ConstructionBody::parse(&raw).unwrap();
        assert_eq!(body.request_id, id);
        assert_eq!(body.param, "T-123");
    }

    #[test]
    fn test_malformed_body_is_an_error() {
        assert!(CallbackBody::parse("not json").is_err());
        assert!(ConstructionBody::parse(r#"{"requestId": 7}"#).is_err());
    }

    #[test]
    fn test_injection_string_with_request_id() {
        let id = CorrelationId::mint();
        let message = OutboundMessage::new(
            "bridgeInvoke",
            OutboundEnvelope {
                params: vec![json!(null), json!("getCenter")],
                request_id: Some(id),
            },
        );

        let rendered = message.injection_string().unwrap();
        assert!(rendered.starts_with("bridgeInvoke("));
        assert!(rendered.ends_with(')'));

        let envelope: Value =
            serde_json::from_str(&rendered["bridgeInvoke(".len()..rendered.len() - 1]).unwrap();
        assert_eq!(envelope["requestId"], json!(id.to_string()));
        assert_eq!(envelope["params"], json!([null, "getCenter"]));
    }

    #[test]
    fn test_injection_string_omits_absent_request_id() {
        let message = OutboundMessage::new(
            "bridgeInvoke",
            OutboundEnvelope {
                params: vec![json!("panTo")],
                request_id: None,
            },
        );

        let rendered = message.injection_string().unwrap();
        assert!(!rendered.contains("requestId"));
    }
}
