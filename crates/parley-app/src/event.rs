//! Application input events.
//!
//! This module defines [`AppEvent`], the complete set of inputs that drive the
//! [`crate::App`] state machine.
//!
//! Events originate from three sources:
//! - User intents and system ticks.
//! - Transport notifications for a specific connection id.
//! - Answers from the directory service.

use parley_core::TransportEvent;
use parley_proto::{Context, HistoryEntry, RoomEntry, RoomInfo, UserEntry};

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Periodic tick. Fires due reconnects.
    Tick,

    /// User picked a room.
    SelectRoom(String),

    /// User picked a peer for a direct message.
    SelectDirectMessage(String),

    /// User left the current context.
    ClearSelection,

    /// Composer contents changed; carries the new length in characters.
    InputChanged(usize),

    /// User submitted the composer.
    Submit(String),

    /// User asked to join a room.
    JoinRoom(String),

    /// User asked to create a room.
    CreateRoom(String),

    /// User asked to reload room and user lists.
    RefreshDirectory,

    /// User asked for room details.
    RoomInfo(String),

    /// Transport notification.
    Transport(TransportEvent),

    /// Directory service answer.
    Directory(DirectoryResponse),

    /// User asked to quit.
    Quit,
}

/// Answers from the directory service.
///
/// Failed requests degrade to empty results (or `ok: false`) in the driver,
/// so every request produces exactly one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryResponse {
    /// Room listing.
    Rooms(Vec<RoomEntry>),
    /// User listing.
    Users(Vec<UserEntry>),
    /// Membership answer for a room.
    Membership {
        /// Room asked about.
        room: String,
        /// Whether the local user is a member.
        is_member: bool,
    },
    /// Message history for a context, oldest first.
    History {
        /// Context the history belongs to.
        context: Context,
        /// Past messages.
        entries: Vec<HistoryEntry>,
    },
    /// Join outcome.
    Joined {
        /// Room.
        room: String,
        /// True if the local user is now a member.
        ok: bool,
    },
    /// Create outcome.
    Created {
        /// Name as requested.
        requested: String,
        /// Canonical room name on success, reason on failure.
        outcome: Result<String, String>,
    },
    /// Room details.
    RoomInfo(RoomInfo),
}
