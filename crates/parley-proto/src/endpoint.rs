//! Live transport addressing.
//!
//! Room connections live under `/ws/chat/<room>/` and direct-message
//! connections under `/ws/dm/<peer>/`. The target id is percent-encoded so
//! names containing spaces or slashes stay a single path component.

use crate::{
    context::Context,
    errors::{ProtocolError, Result},
};

/// WebSocket base address of the chat service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// `ws://host[:port]` or `wss://host[:port]`, without trailing slash.
    base: String,
}

impl Endpoint {
    /// Endpoint from a server URL.
    ///
    /// `http` maps to `ws` and `https` to `wss`; `ws`/`wss` are kept as is.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::UnsupportedScheme` for any other scheme
    pub fn from_server_url(server: &str) -> Result<Self> {
        let server = server.trim().trim_end_matches('/');

        let base = if let Some(rest) = server.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = server.strip_prefix("http://") {
            format!("ws://{rest}")
        } else if server.starts_with("wss://") || server.starts_with("ws://") {
            server.to_string()
        } else {
            return Err(ProtocolError::UnsupportedScheme(server.to_string()));
        };

        Ok(Self { base })
    }

    /// WebSocket base without trailing slash.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Full connection URL for `context`. `None` for [`Context::None`].
    pub fn url_for(&self, context: &Context) -> Option<String> {
        let segment = context.kind().path_segment()?;
        let target = context.target()?;
        Some(format!("{}/ws/{segment}/{}/", self.base, urlencoding::encode(target)))
    }
}
