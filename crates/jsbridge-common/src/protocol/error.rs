use thiserror::Error;

use super::id::CorrelationId;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("No registration for correlation id {0}")]
    UnknownCorrelation(CorrelationId),

    #[error("Arity mismatch: expected {expected} parameter(s), got {got}")]
    Arity { expected: usize, got: usize },

    #[error("Timed out after {0}ms waiting for a reply")]
    Timeout(u64),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Remote handle has not resolved")]
    HandleUnresolved,
}

pub type Result<T> = std::result::Result<T, BridgeError>;
