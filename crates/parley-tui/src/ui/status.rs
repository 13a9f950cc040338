//! Status bar
//!
//! Displays connection status and the last status message.

use parley_core::LinkStatus;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::ViewState;

/// Render the status bar.
pub fn render(frame: &mut Frame, view: &ViewState, area: Rect) {
    let link = match view.link_status {
        LinkStatus::Offline => Span::styled("Offline", Style::default().fg(Color::Gray)),
        LinkStatus::Connecting => Span::styled("Connecting...", Style::default().fg(Color::Yellow)),
        LinkStatus::Connected => Span::styled(
            "Connected",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        LinkStatus::Reconnecting { attempt } => Span::styled(
            format!("Reconnecting (attempt {attempt})"),
            Style::default().fg(Color::Red),
        ),
    };

    let message = view.status.as_deref().map_or_else(String::new, |status| format!(" | {status}"));

    let status_line = Line::from(vec![Span::raw(" "), link, Span::raw(message)]);
    let paragraph =
        Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
