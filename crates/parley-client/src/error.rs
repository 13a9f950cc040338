//! Transport error types.

use thiserror::Error;

/// Errors from the WebSocket transport and the directory client.
#[derive(Debug, Error)]
pub enum TransportError {
    /// WebSocket connection could not be established or broke.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Connection task is gone or its queue is full.
    #[error("connection closed")]
    Closed,

    /// Session cookie cannot be used as a header value.
    #[error("invalid session cookie: {0}")]
    Cookie(String),

    /// HTTP request failed or returned an error status.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service understood the request and refused it.
    #[error("rejected: {0}")]
    Rejected(String),
}
