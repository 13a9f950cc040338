//! Sidebar
//!
//! Rooms, with membership markers, and users available for direct messages.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

use crate::ViewState;

const MEMBER_PREFIX: &str = "# ";
const NON_MEMBER_PREFIX: &str = "+ ";

/// Render the sidebar.
pub fn render(frame: &mut Frame, view: &ViewState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let [rooms_area, users_area] = chunks.as_ref() else {
        return;
    };

    let rooms: Vec<ListItem> = view
        .rooms
        .iter()
        .map(|room| {
            let (prefix, style) = if room.is_member {
                (MEMBER_PREFIX, Style::default())
            } else {
                (NON_MEMBER_PREFIX, Style::default().fg(Color::DarkGray))
            };
            let name = Span::styled(room.name.as_str(), style);
            ListItem::new(Line::from(vec![Span::raw(prefix), name]))
        })
        .collect();

    let users: Vec<ListItem> =
        view.users.iter().map(|user| ListItem::new(user.username.as_str())).collect();

    frame.render_widget(
        List::new(rooms).block(Block::default().borders(Borders::ALL).title(" Rooms ")),
        *rooms_area,
    );
    frame.render_widget(
        List::new(users).block(Block::default().borders(Borders::ALL).title(" Users ")),
        *users_area,
    );
}
