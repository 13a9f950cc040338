//! Session configuration and view-model types.

use std::time::Duration;

use parley_core::DEFAULT_RECONNECT_DELAY;
use parley_proto::HistoryEntry;

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Username of the signed-in user.
    pub local_user: String,
    /// Delay before reconnecting after an unexpected close.
    pub reconnect_delay: Duration,
}

impl SessionConfig {
    /// Configuration for `local_user` with the default reconnect delay.
    pub fn new(local_user: impl Into<String>) -> Self {
        Self { local_user: local_user.into(), reconnect_delay: DEFAULT_RECONNECT_DELAY }
    }
}

/// A message line ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    /// Author username.
    pub sender: String,
    /// Message text.
    pub body: String,
    /// Author avatar reference.
    pub avatar: Option<String>,
    /// Server timestamp. Only present for history.
    pub timestamp: Option<String>,
    /// True if the local user wrote it.
    pub own: bool,
}

impl ChatLine {
    /// Line for a live message.
    pub fn live(sender: String, body: String, avatar: Option<String>, local_user: &str) -> Self {
        let own = sender == local_user;
        Self { sender, body, avatar, timestamp: None, own }
    }

    /// Line for a history entry.
    pub fn from_history(entry: HistoryEntry, local_user: &str) -> Self {
        let own = entry.sender == local_user;
        Self {
            sender: entry.sender,
            body: entry.body,
            avatar: entry.avatar,
            timestamp: entry.timestamp,
            own,
        }
    }
}
