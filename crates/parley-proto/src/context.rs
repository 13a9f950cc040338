//! Conversation context.
//!
//! A [`Context`] names what the user is looking at: a room, a direct-message
//! peer, or nothing. Every live connection is opened for exactly one context
//! (its scope), so comparing a connection's scope with the current context is
//! how staleness is detected.

use std::fmt;

use crate::errors::{ProtocolError, Result};

/// Kind of conversation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    /// No target selected.
    None,
    /// Named chat room.
    Room,
    /// One-to-one conversation with another user.
    DirectMessage,
}

impl ContextKind {
    /// Path segment used by the live transport for this kind. `None` has no
    /// endpoint.
    pub fn path_segment(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Room => Some("chat"),
            Self::DirectMessage => Some("dm"),
        }
    }
}

/// The active conversation target.
///
/// Constructed through [`Context::room`] and [`Context::direct_message`], which
/// reject blank targets, so a non-`None` context always carries a usable id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Context {
    /// Nothing selected (session start, or the user navigated away).
    #[default]
    None,
    /// A room, by name.
    Room(String),
    /// A direct-message conversation, by peer username.
    DirectMessage(String),
}

impl Context {
    /// Room context. Surrounding whitespace is dropped from `name`.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::EmptyTarget` if `name` is empty or whitespace-only
    pub fn room(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(ProtocolError::EmptyTarget("room"));
        }
        Ok(Self::Room(name.to_string()))
    }

    /// Direct-message context. Surrounding whitespace is dropped from `peer`.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::EmptyTarget` if `peer` is empty or whitespace-only
    pub fn direct_message(peer: impl Into<String>) -> Result<Self> {
        let peer = peer.into();
        let peer = peer.trim();
        if peer.is_empty() {
            return Err(ProtocolError::EmptyTarget("direct message"));
        }
        Ok(Self::DirectMessage(peer.to_string()))
    }

    /// Kind of this context.
    pub fn kind(&self) -> ContextKind {
        match self {
            Self::None => ContextKind::None,
            Self::Room(_) => ContextKind::Room,
            Self::DirectMessage(_) => ContextKind::DirectMessage,
        }
    }

    /// Room name or peer username. `None` for [`Context::None`].
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Room(id) | Self::DirectMessage(id) => Some(id),
        }
    }

    /// True if nothing is selected.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Room name if this is a room context.
    pub fn as_room(&self) -> Option<&str> {
        match self {
            Self::Room(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Room(name) => write!(f, "room:{name}"),
            Self::DirectMessage(peer) => write!(f, "dm:{peer}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_targets_rejected() {
        assert_eq!(Context::room(""), Err(ProtocolError::EmptyTarget("room")));
        assert_eq!(Context::room("   "), Err(ProtocolError::EmptyTarget("room")));
        assert!(matches!(Context::direct_message("\t"), Err(ProtocolError::EmptyTarget(_))));
    }

    #[test]
    fn targets_are_trimmed() {
        assert_eq!(Context::room(" general\t"), Ok(Context::Room("general".into())));
        assert_eq!(Context::direct_message("  bob "), Ok(Context::DirectMessage("bob".into())));
    }

    #[test]
    fn target_and_kind() {
        let room = Context::room("general").unwrap();
        assert_eq!(room.kind(), ContextKind::Room);
        assert_eq!(room.target(), Some("general"));
        assert_eq!(room.as_room(), Some("general"));

        let dm = Context::direct_message("alice").unwrap();
        assert_eq!(dm.kind(), ContextKind::DirectMessage);
        assert_eq!(dm.as_room(), None);

        assert!(Context::default().is_none());
        assert_eq!(Context::None.target(), None);
    }

    #[test]
    fn display_names_scope() {
        assert_eq!(Context::room("lobby").unwrap().to_string(), "room:lobby");
        assert_eq!(Context::direct_message("bob").unwrap().to_string(), "dm:bob");
        assert_eq!(Context::None.to_string(), "none");
    }
}
