//! Terminal view model.
//!
//! [`ViewState`] is what the session's render operations write into and what
//! the [`crate::ui`] functions draw from.

use parley_app::{ChatLine, UiSink};
use parley_core::LinkStatus;
use parley_proto::{RoomEntry, RoomInfo, UserEntry};

use crate::InputState;

/// One line in the message pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLine {
    /// A chat message.
    Chat(ChatLine),
    /// A presence change or other notice.
    Notice(String),
}

/// Everything the terminal shows.
#[derive(Debug)]
pub struct ViewState {
    /// Header line above the message pane.
    pub header: String,
    /// Message pane.
    pub log: Vec<LogLine>,
    /// Composer.
    pub composer: InputState,
    /// Whether the composer accepts messages.
    pub input_enabled: bool,
    /// Peer shown as typing.
    pub typing: Option<String>,
    /// Room the user is viewing without being a member.
    pub join_banner: Option<String>,
    /// Room sidebar.
    pub rooms: Vec<RoomEntry>,
    /// User sidebar.
    pub users: Vec<UserEntry>,
    /// Connection status.
    pub link_status: LinkStatus,
    /// Transient status message.
    pub status: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            header: String::new(),
            log: Vec::new(),
            composer: InputState::new(),
            input_enabled: false,
            typing: None,
            join_banner: None,
            rooms: Vec::new(),
            users: Vec::new(),
            link_status: LinkStatus::Offline,
            status: None,
        }
    }
}

impl ViewState {
    /// Empty view.
    pub fn new() -> Self {
        Self::default()
    }
}

impl UiSink for ViewState {
    fn render_message(&mut self, line: ChatLine) {
        self.log.push(LogLine::Chat(line));
    }

    fn clear_messages(&mut self) {
        self.log.clear();
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }

    fn set_typing_indicator(&mut self, typist: Option<String>) {
        self.typing = typist;
    }

    fn set_header_text(&mut self, text: String) {
        self.header = text;
    }

    fn clear_input(&mut self) {
        self.composer.clear();
    }

    fn render_rooms(&mut self, rooms: Vec<RoomEntry>) {
        self.rooms = rooms;
    }

    fn render_users(&mut self, users: Vec<UserEntry>) {
        self.users = users;
    }

    fn render_room_info(&mut self, info: RoomInfo) {
        let creator = info.created_by.as_deref().unwrap_or("unknown");
        let online = if info.users_active.is_empty() {
            "nobody".to_string()
        } else {
            info.users_active.join(", ")
        };
        self.log.push(LogLine::Notice(format!(
            "#{}: created by {creator}, {} members, online: {online}",
            info.room,
            info.users.len()
        )));
    }

    fn show_presence(&mut self, username: String, online: bool) {
        let verb = if online { "joined" } else { "left" };
        self.log.push(LogLine::Notice(format!("{username} {verb}")));
    }

    fn set_link_status(&mut self, status: LinkStatus) {
        self.link_status = status;
    }

    fn set_status(&mut self, message: String) {
        self.status = Some(message);
    }

    fn set_join_banner(&mut self, room: Option<String>) {
        self.join_banner = room;
    }
}

#[cfg(test)]
mod tests {
    use parley_app::UiUpdate;

    use super::*;

    #[test]
    fn clear_input_empties_composer() {
        let mut view = ViewState::new();
        view.composer.handle_key(crate::KeyInput::Char('x'), true);
        view.apply(UiUpdate::ClearInput);
        assert!(view.composer.buffer().is_empty());
    }

    #[test]
    fn presence_and_info_become_notices() {
        let mut view = ViewState::new();
        view.apply(UiUpdate::ShowPresence { username: "alice".into(), online: true });
        view.apply(UiUpdate::RenderRoomInfo(RoomInfo {
            room: "general".into(),
            created_by: Some("bob".into()),
            users: vec!["alice".into(), "bob".into()],
            users_active: vec!["alice".into()],
        }));

        assert_eq!(view.log, [
            LogLine::Notice("alice joined".into()),
            LogLine::Notice("#general: created by bob, 2 members, online: alice".into()),
        ]);

        view.apply(UiUpdate::ClearMessages);
        assert!(view.log.is_empty());
    }
}
