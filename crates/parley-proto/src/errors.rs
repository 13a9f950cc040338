//! Protocol error types.

use thiserror::Error;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced while validating or decoding protocol data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A room name or peer username was empty or whitespace-only.
    #[error("empty {0} target")]
    EmptyTarget(&'static str),

    /// Payload was not valid JSON for the expected shape.
    #[error("invalid JSON: {0}")]
    Json(String),

    /// A field required to interpret the frame was absent or empty.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// Endpoint base URL uses a scheme we cannot map to a WebSocket URL.
    #[error("unsupported URL scheme in {0:?}")]
    UnsupportedScheme(String),
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}
