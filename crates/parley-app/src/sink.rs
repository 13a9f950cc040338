//! Render operations.
//!
//! The session never draws anything itself. It emits [`UiUpdate`] values that
//! the runtime hands to a [`UiSink`]: a terminal front end turns them into
//! widgets, the simulation harness records them.

use parley_core::LinkStatus;
use parley_proto::{RoomEntry, RoomInfo, UserEntry};

use crate::ChatLine;

/// A single view update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiUpdate {
    /// Append a line to the message log.
    RenderMessage(ChatLine),
    /// Empty the message log.
    ClearMessages,
    /// Enable or disable the composer.
    SetInputEnabled(bool),
    /// Show "<user> is typing", or hide the indicator.
    SetTypingIndicator(Option<String>),
    /// Replace the header line.
    SetHeaderText(String),
    /// Empty the composer.
    ClearInput,
    /// Replace the room list.
    RenderRooms(Vec<RoomEntry>),
    /// Replace the user list.
    RenderUsers(Vec<UserEntry>),
    /// Show room details.
    RenderRoomInfo(RoomInfo),
    /// A user came online or went offline in the current context.
    ShowPresence {
        /// Username.
        username: String,
        /// True for online.
        online: bool,
    },
    /// Connection status changed.
    SetLinkStatus(LinkStatus),
    /// Transient status line.
    SetStatus(String),
    /// Show the "join this room" banner for a room, or hide it.
    SetJoinBanner(Option<String>),
}

/// Opaque render operations implemented by each front end.
pub trait UiSink {
    /// Append a message to the log.
    fn render_message(&mut self, line: ChatLine);

    /// Empty the message log.
    fn clear_messages(&mut self);

    /// Enable or disable the composer.
    fn set_input_enabled(&mut self, enabled: bool);

    /// Show or hide the typing indicator.
    fn set_typing_indicator(&mut self, typist: Option<String>);

    /// Replace the header line.
    fn set_header_text(&mut self, text: String);

    /// Empty the composer.
    fn clear_input(&mut self);

    /// Replace the room list.
    fn render_rooms(&mut self, rooms: Vec<RoomEntry>);

    /// Replace the user list.
    fn render_users(&mut self, users: Vec<UserEntry>);

    /// Show room details.
    fn render_room_info(&mut self, info: RoomInfo);

    /// Report a presence change.
    fn show_presence(&mut self, username: String, online: bool);

    /// Show connection status.
    fn set_link_status(&mut self, status: LinkStatus);

    /// Show a transient status message.
    fn set_status(&mut self, message: String);

    /// Show or hide the join banner.
    fn set_join_banner(&mut self, room: Option<String>);

    /// Dispatch an update to the matching operation.
    fn apply(&mut self, update: UiUpdate) {
        match update {
            UiUpdate::RenderMessage(line) => self.render_message(line),
            UiUpdate::ClearMessages => self.clear_messages(),
            UiUpdate::SetInputEnabled(enabled) => self.set_input_enabled(enabled),
            UiUpdate::SetTypingIndicator(typist) => self.set_typing_indicator(typist),
            UiUpdate::SetHeaderText(text) => self.set_header_text(text),
            UiUpdate::ClearInput => self.clear_input(),
            UiUpdate::RenderRooms(rooms) => self.render_rooms(rooms),
            UiUpdate::RenderUsers(users) => self.render_users(users),
            UiUpdate::RenderRoomInfo(info) => self.render_room_info(info),
            UiUpdate::ShowPresence { username, online } => self.show_presence(username, online),
            UiUpdate::SetLinkStatus(status) => self.set_link_status(status),
            UiUpdate::SetStatus(message) => self.set_status(message),
            UiUpdate::SetJoinBanner(room) => self.set_join_banner(room),
        }
    }
}
