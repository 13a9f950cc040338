//! Input line
//!
//! Displays the composer with cursor, or the join prompt when the composer
//! is disabled.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};

use crate::ViewState;

const PROMPT_WIDTH: u16 = 2; // "> "
const BORDER_WIDTH: u16 = 1;
const INPUT_LINE_OFFSET_Y: u16 = 1; // inside top border
const RIGHT_PADDING: u16 = 1; // inside right border

/// Render the input line.
pub fn render(frame: &mut Frame, view: &ViewState, area: Rect) {
    let mut block = Block::default().borders(Borders::ALL);
    if let Some(room) = &view.join_banner {
        block = block
            .title(format!(" Not a member of {room}. Type /join {room} to join "))
            .border_style(Style::default().fg(Color::Yellow));
    }

    let style = if view.input_enabled {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let paragraph =
        Paragraph::new(format!("> {}", view.composer.buffer())).style(style).block(block);

    frame.render_widget(paragraph, area);

    let available_width = area.width.saturating_sub(PROMPT_WIDTH + BORDER_WIDTH + RIGHT_PADDING);
    let cursor_offset =
        u16::try_from(view.composer.cursor()).unwrap_or(u16::MAX).min(available_width);

    let cursor_x =
        area.x.saturating_add(BORDER_WIDTH + PROMPT_WIDTH).saturating_add(cursor_offset);
    let cursor_y = area.y.saturating_add(INPUT_LINE_OFFSET_Y);
    let max_x = area.x.saturating_add(area.width).saturating_sub(RIGHT_PADDING + BORDER_WIDTH);

    frame.set_cursor_position((cursor_x.min(max_x), cursor_y));
}
