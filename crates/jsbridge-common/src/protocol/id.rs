//! Correlation Identifiers
//!
//! Every outstanding asynchronous exchange with the embedded runtime is keyed
//! by a [`CorrelationId`]: registered callbacks, pending call results, and
//! in-flight object constructions. Ids carry no semantic content and are
//! compared only for equality.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::error::BridgeError;

/// Opaque, globally-unique 128-bit identifier minted per outstanding exchange.
///
/// On the wire an id always travels as its hyphenated string form, which is
/// what [`fmt::Display`] and [`FromStr`] produce and accept.
///
/// # Example
///
/// ```
/// use jsbridge_common::CorrelationId;
///
/// let id = CorrelationId::mint();
/// let parsed: CorrelationId = id.to_string().parse().unwrap();
/// assert_eq!(id, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// Mints a fresh, globally-unique id.
    pub fn mint() -> Self {
        CorrelationId(Uuid::new_v4())
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for CorrelationId {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(CorrelationId)
            .map_err(|e| BridgeError::Encoding(format!("Invalid correlation id '{}': {}", s, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minted_ids_are_distinct() {
        let a = CorrelationId::mint();
        let b = CorrelationId::mint();
        assert_ne!(a, b);
    }

    #[test]
    fn test_string_round_trip() {
        let id = CorrelationId::mint();
        let parsed: CorrelationId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_serializes_as_string() {
        let id = CorrelationId::mint();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::Value::String(id.to_string()));
    }

    #[test]
    fn test_rejects_malformed_id() {
        let result = "not-a-uuid".parse::<CorrelationId>();
        assert!(matches!(result, Err(BridgeError::Encoding(_))));
    }
}
