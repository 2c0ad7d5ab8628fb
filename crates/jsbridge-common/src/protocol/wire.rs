//! Wire references
//!
//! Remote objects and registered host callbacks travel as a small tagged
//! record, `{"type": "...", "value": "<id>"}`. The tag is the declared type of
//! the host value, never something recovered from the payload itself.

use serde::{Deserialize, Serialize};

use super::error::Result;
use super::id::CorrelationId;

/// Declared type of a wire reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WireTag {
    /// A remote entity addressed by its id
    Object,
    /// A registered host callback taking no argument
    Runnable,
    /// A registered host callback taking one argument
    Consumer,
}

/// The `{type, value}` record referencing a remote object or a registered
/// host callback by id.
///
/// # Example
///
/// ```
/// use jsbridge_common::{CorrelationId, WireRef, WireTag};
///
/// let id = CorrelationId::mint();
/// let wire = WireRef::object(id);
/// assert_eq!(wire.tag, WireTag::Object);
/// assert_eq!(wire.value, id.to_string());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRef {
    /// Declared type of the referenced value
    #[serde(rename = "type")]
    pub tag: WireTag,
    /// The referenced correlation id, as a string
    pub value: String,
}

impl WireRef {
    pub fn new(tag: WireTag, id: CorrelationId) -> Self {
        WireRef {
            tag,
            value: id.to_string(),
        }
    }

    /// Reference to a remote entity.
    pub fn object(id: CorrelationId) -> Self {
        Self::new(WireTag::Object, id)
    }

    /// Reference to a registered no-argument callback.
    pub fn runnable(id: CorrelationId) -> Self {
        Self::new(WireTag::Runnable, id)
    }

    /// Reference to a registered one-argument callback.
    pub fn consumer(id: CorrelationId) -> Self {
        Self::new(WireTag::Consumer, id)
    }

    /// Renders the reference as a JSON tree node.
    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tags_serialize_uppercase() {
        let id = CorrelationId::mint();
        let wire = WireRef::object(id).to_value().unwrap();
        assert_eq!(wire, json!({"type": "OBJECT", "value": id.to_string()}));

        let wire = WireRef::runnable(id).to_value().unwrap();
        assert_eq!(wire["type"], "RUNNABLE");

        let wire = WireRef::consumer(id).to_value().unwrap();
        assert_eq!(wire["type"], "CONSUMER");
    }

    #[test]
    fn test_wire_ref_round_trip() {
        let wire = WireRef::consumer(CorrelationId::mint());
        let value = wire.to_value().unwrap();
        let back: WireRef = serde_json::from_value(value).unwrap();
        assert_eq!(wire, back);
    }
}
