//! Protocol errors.

use thiserror::Error;

/// Result type for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while encoding messages or reading a bootstrap.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// JSON (de)serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A message did not serialize to a JSON object.
    #[error("message {0} did not encode to an object")]
    NotAnObject(&'static str),
}
