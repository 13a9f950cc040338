//! Session error types.

use parley_proto::ProtocolError;
use thiserror::Error;

/// Errors returned by [`crate::App`] operations.
///
/// Every rejected operation leaves the session unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Navigation or directory target was empty or whitespace.
    #[error("{0} target must not be empty")]
    EmptyTarget(&'static str),

    /// Protocol-level failure.
    #[error(transparent)]
    Protocol(ProtocolError),
}

impl From<ProtocolError> for AppError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::EmptyTarget(what) => Self::EmptyTarget(what),
            other => Self::Protocol(other),
        }
    }
}
