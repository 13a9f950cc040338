//! UI rendering
//!
//! Rendering functions that convert [`ViewState`] into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! drawing widget trees.

mod chat;
mod input;
mod sidebar;
mod status;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};

use crate::ViewState;

/// Render the entire UI.
pub fn render(frame: &mut Frame, view: &ViewState) {
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(MAIN_AREA_MIN_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [main_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    render_main_area(frame, view, *main_area);
    input::render(frame, view, *input_area);
    status::render(frame, view, *status_area);
}

/// Render the main area (sidebar + chat).
fn render_main_area(frame: &mut Frame, view: &ViewState, area: Rect) {
    const SIDEBAR_WIDTH: u16 = 20;
    const CHAT_AREA_MIN_WIDTH: u16 = 20;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(CHAT_AREA_MIN_WIDTH)])
        .split(area);

    let [sidebar_area, chat_area] = chunks.as_ref() else {
        return;
    };

    sidebar::render(frame, view, *sidebar_area);
    chat::render(frame, view, *chat_area);
}

#[cfg(test)]
mod tests {
    use parley_app::{ChatLine, UiSink};
    use parley_core::LinkStatus;
    use parley_proto::RoomEntry;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    fn draw(view: &ViewState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| render(frame, view)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn renders_conversation() {
        let mut view = ViewState::new();
        view.set_header_text("Room: general".into());
        view.render_rooms(vec![
            RoomEntry { name: "general".into(), is_member: true },
            RoomEntry { name: "random".into(), is_member: false },
        ]);
        view.render_message(ChatLine::live("alice".into(), "hello there".into(), None, "me"));
        view.set_typing_indicator(Some("alice".into()));
        view.set_link_status(LinkStatus::Connected);

        let screen = draw(&view);
        assert!(screen.contains("Room: general"));
        assert!(screen.contains("alice: hello there"));
        assert!(screen.contains("alice is typing"));
        assert!(screen.contains("# general"));
        assert!(screen.contains("Connected"));
    }

    #[test]
    fn renders_join_banner() {
        let mut view = ViewState::new();
        view.set_header_text("Room: random".into());
        view.set_join_banner(Some("random".into()));
        view.set_link_status(LinkStatus::Reconnecting { attempt: 2 });

        let screen = draw(&view);
        assert!(screen.contains("/join random"));
        assert!(screen.contains("Reconnecting (attempt 2)"));
    }
}
