//! Input state and key handling for the terminal.
//!
//! This module owns the composer buffer and cursor and turns key presses into
//! session events. Every edit of a message reports the new length so the
//! session can send typing signals; command lines are parsed on Enter.

use parley_app::AppEvent;

use crate::commands::{self, Command};

/// Terminal-agnostic key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key (delete character before cursor).
    Backspace,
    /// Delete key (delete character at cursor).
    Delete,
    /// Escape key (quit).
    Esc,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Home key (cursor to start).
    Home,
    /// End key (cursor to end).
    End,
}

/// What a key press asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Feed an event to the session.
    Event(AppEvent),
    /// Show a local status message.
    Status(String),
}

/// Composer buffer and cursor.
///
/// The cursor counts characters, not bytes.
#[derive(Debug, Default)]
pub struct InputState {
    buffer: String,
    cursor: usize,
}

impl InputState {
    /// Create an empty composer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Empty the composer.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    /// Handle a key press.
    ///
    /// With `input_enabled` false, messages are refused locally and no typing
    /// signals are produced; commands still work.
    pub fn handle_key(&mut self, key: KeyInput, input_enabled: bool) -> Vec<Intent> {
        let edited = match key {
            KeyInput::Char(c) => {
                let at = self.byte_index(self.cursor);
                self.buffer.insert(at, c);
                self.cursor += 1;
                true
            },
            KeyInput::Backspace => {
                if self.cursor == 0 {
                    false
                } else {
                    self.cursor -= 1;
                    let at = self.byte_index(self.cursor);
                    self.buffer.remove(at);
                    true
                }
            },
            KeyInput::Delete => {
                if self.cursor < self.len() {
                    let at = self.byte_index(self.cursor);
                    self.buffer.remove(at);
                    true
                } else {
                    false
                }
            },
            KeyInput::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            },
            KeyInput::Right => {
                self.cursor = (self.cursor + 1).min(self.len());
                false
            },
            KeyInput::Home => {
                self.cursor = 0;
                false
            },
            KeyInput::End => {
                self.cursor = self.len();
                false
            },
            KeyInput::Enter => return self.handle_enter(input_enabled),
            KeyInput::Esc => return vec![Intent::Event(AppEvent::Quit)],
        };

        if edited && input_enabled {
            vec![Intent::Event(AppEvent::InputChanged(self.message_len()))]
        } else {
            Vec::new()
        }
    }

    /// Enter: run a command, or submit a message.
    ///
    /// Commands clear the composer immediately. Messages stay until the
    /// session confirms the send with a clear.
    fn handle_enter(&mut self, input_enabled: bool) -> Vec<Intent> {
        if self.buffer.trim().is_empty() {
            return Vec::new();
        }

        let Some(command) = commands::parse(&self.buffer) else {
            if !input_enabled {
                return vec![Intent::Status("Join the room to send messages".to_string())];
            }
            return vec![Intent::Event(AppEvent::Submit(self.buffer.clone()))];
        };

        self.clear();
        match command {
            Command::Help => vec![Intent::Status(commands::HELP.to_string())],
            Command::MissingArgument { command, expected } => {
                vec![Intent::Status(format!("/{command} needs a {expected}"))]
            },
            Command::Unknown(name) => vec![Intent::Status(format!("Unknown command: /{name}"))],
            command => command.into_event().map(Intent::Event).into_iter().collect(),
        }
    }

    /// Message length for typing signals. A command line counts as empty.
    fn message_len(&self) -> usize {
        if commands::parse(&self.buffer).is_some() { 0 } else { self.len() }
    }

    fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_index(&self, chars: usize) -> usize {
        self.buffer.char_indices().nth(chars).map_or(self.buffer.len(), |(at, _)| at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(input: &mut InputState, text: &str, enabled: bool) -> Vec<Intent> {
        text.chars().flat_map(|c| input.handle_key(KeyInput::Char(c), enabled)).collect()
    }

    #[test]
    fn every_edit_reports_length() {
        let mut input = InputState::new();
        let intents = type_text(&mut input, "hi", true);
        assert_eq!(intents, [
            Intent::Event(AppEvent::InputChanged(1)),
            Intent::Event(AppEvent::InputChanged(2)),
        ]);

        assert_eq!(input.handle_key(KeyInput::Backspace, true), [Intent::Event(
            AppEvent::InputChanged(1)
        )]);
        assert_eq!(input.buffer(), "h");
    }

    #[test]
    fn cursor_moves_by_characters() {
        let mut input = InputState::new();
        type_text(&mut input, "héllo", true);

        input.handle_key(KeyInput::Home, true);
        input.handle_key(KeyInput::Right, true);
        input.handle_key(KeyInput::Right, true);
        input.handle_key(KeyInput::Backspace, true);
        assert_eq!(input.buffer(), "hllo");
        assert_eq!(input.cursor(), 1);

        input.handle_key(KeyInput::Delete, true);
        assert_eq!(input.buffer(), "hlo");

        input.handle_key(KeyInput::End, true);
        assert_eq!(input.cursor(), 3);
        input.handle_key(KeyInput::Right, true);
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn enter_submits_and_keeps_text() {
        let mut input = InputState::new();
        type_text(&mut input, "hello", true);

        assert_eq!(input.handle_key(KeyInput::Enter, true), [Intent::Event(AppEvent::Submit(
            "hello".into()
        ))]);
        assert_eq!(input.buffer(), "hello");

        input.clear();
        assert!(input.buffer().is_empty());
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn disabled_input_refuses_messages() {
        let mut input = InputState::new();
        assert!(type_text(&mut input, "hey", false).is_empty());
        assert!(matches!(input.handle_key(KeyInput::Enter, false).as_slice(), [Intent::Status(_)]));
    }

    #[test]
    fn commands_clear_and_emit() {
        let mut input = InputState::new();
        type_text(&mut input, "/join general", false);

        assert_eq!(input.handle_key(KeyInput::Enter, false), [Intent::Event(AppEvent::JoinRoom(
            "general".into()
        ))]);
        assert!(input.buffer().is_empty());
    }

    #[test]
    fn command_lines_do_not_count_as_typing() {
        let mut input = InputState::new();
        let intents = type_text(&mut input, "/r", true);
        assert_eq!(intents, [
            Intent::Event(AppEvent::InputChanged(0)),
            Intent::Event(AppEvent::InputChanged(0)),
        ]);
    }

    #[test]
    fn blank_enter_does_nothing() {
        let mut input = InputState::new();
        type_text(&mut input, "   ", true);
        assert!(input.handle_key(KeyInput::Enter, true).is_empty());
    }

    #[test]
    fn escape_quits() {
        let mut input = InputState::new();
        assert_eq!(input.handle_key(KeyInput::Esc, true), [Intent::Event(AppEvent::Quit)]);
    }
}
