//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use parley_core::ConnectionAction;
use parley_proto::Context;

use crate::UiUpdate;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Apply a view update through the UI sink.
    Ui(UiUpdate),

    /// Open, close or write on a connection.
    Transport(ConnectionAction),

    /// Ask the directory service something. The answer comes back as
    /// [`crate::AppEvent::Directory`].
    Directory(DirectoryRequest),

    /// Quit the application.
    Quit,
}

/// Requests to the directory and history service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryRequest {
    /// List all rooms with the local user's membership.
    Rooms,
    /// List all users.
    Users,
    /// Find out whether the local user is a member of `room`.
    Membership {
        /// Room name.
        room: String,
    },
    /// Load message history for a context.
    History {
        /// Room or direct message.
        context: Context,
    },
    /// Join a room.
    Join {
        /// Room name.
        room: String,
    },
    /// Create a room.
    Create {
        /// Requested name.
        name: String,
    },
    /// Fetch room details.
    RoomInfo {
        /// Room name.
        room: String,
    },
}
