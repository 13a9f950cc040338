//! Message pane
//!
//! Header, message log and typing indicator for the active conversation.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

use crate::{LogLine, ViewState};

const BORDER_SIZE: u16 = 2;

/// Render the message pane.
pub fn render(frame: &mut Frame, view: &ViewState, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(format!(" {} ", view.header));

    let mut items: Vec<ListItem> = if view.log.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "No messages yet. /room or /dm to pick a conversation",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        view.log.iter().map(log_item).collect()
    };

    if let Some(typist) = &view.typing {
        items.push(ListItem::new(Line::from(Span::styled(
            format!("{typist} is typing..."),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))));
    }

    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    let skip = items.len().saturating_sub(visible_height);
    let visible_items: Vec<_> = items.into_iter().skip(skip).collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}

fn log_item(line: &LogLine) -> ListItem<'_> {
    match line {
        LogLine::Chat(chat) => {
            let colour = if chat.own { Color::Cyan } else { Color::Green };
            let mut spans = Vec::new();
            if let Some(timestamp) = &chat.timestamp {
                spans.push(Span::styled(
                    format!("{timestamp} "),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            spans.push(Span::styled(
                chat.sender.as_str(),
                Style::default().fg(colour).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(": "));
            spans.push(Span::raw(chat.body.as_str()));
            ListItem::new(Line::from(spans))
        },
        LogLine::Notice(text) => ListItem::new(Line::from(Span::styled(
            format!("* {text}"),
            Style::default().fg(Color::Yellow),
        ))),
    }
}
