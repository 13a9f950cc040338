//! Slash command parsing.
//!
//! ```text
//! /room <name>     switch to a room
//! /dm <user>       switch to a direct message
//! /join <room>     join a room, then switch to it
//! /create <name>   create a room, then switch to it
//! /info <room>     show room details
//! /leave           leave the current conversation
//! /refresh         reload rooms and users
//! /help            list commands
//! /quit            exit
//! ```

use parley_app::AppEvent;

/// Usage line shown by `/help`.
pub const HELP: &str =
    "/room <name>  /dm <user>  /join <room>  /create <name>  /info <room>  /leave  /refresh  /quit";

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/room <name>`
    Room(String),
    /// `/dm <user>`
    DirectMessage(String),
    /// `/join <room>`
    Join(String),
    /// `/create <name>`
    Create(String),
    /// `/info <room>`
    Info(String),
    /// `/leave`
    Leave,
    /// `/refresh`
    Refresh,
    /// `/help`
    Help,
    /// `/quit`
    Quit,
    /// A known command without its argument.
    MissingArgument {
        /// Command name.
        command: &'static str,
        /// What was expected.
        expected: &'static str,
    },
    /// Anything else starting with `/`.
    Unknown(String),
}

impl Command {
    /// Event this command asks of the session, if any.
    pub fn into_event(self) -> Option<AppEvent> {
        match self {
            Self::Room(name) => Some(AppEvent::SelectRoom(name)),
            Self::DirectMessage(peer) => Some(AppEvent::SelectDirectMessage(peer)),
            Self::Join(room) => Some(AppEvent::JoinRoom(room)),
            Self::Create(name) => Some(AppEvent::CreateRoom(name)),
            Self::Info(room) => Some(AppEvent::RoomInfo(room)),
            Self::Leave => Some(AppEvent::ClearSelection),
            Self::Refresh => Some(AppEvent::RefreshDirectory),
            Self::Quit => Some(AppEvent::Quit),
            Self::Help | Self::MissingArgument { .. } | Self::Unknown(_) => None,
        }
    }
}

/// Parse `input` as a command. Returns `None` for plain message text.
pub fn parse(input: &str) -> Option<Command> {
    let rest = input.trim().strip_prefix('/')?;
    let (name, argument) = match rest.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (rest, ""),
    };

    let with_argument =
        |command: &'static str, expected: &'static str, build: fn(String) -> Command| {
            if argument.is_empty() {
                Command::MissingArgument { command, expected }
            } else {
                build(argument.to_string())
            }
        };

    let command = match name {
        "room" | "r" => with_argument("room", "room name", Command::Room),
        "dm" | "msg" => with_argument("dm", "username", Command::DirectMessage),
        "join" | "j" => with_argument("join", "room name", Command::Join),
        "create" => with_argument("create", "room name", Command::Create),
        "info" => with_argument("info", "room name", Command::Info),
        "leave" => Command::Leave,
        "refresh" => Command::Refresh,
        "help" | "?" => Command::Help,
        "quit" | "q" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(parse("hello"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn parses_arguments() {
        assert_eq!(parse("/room general"), Some(Command::Room("general".into())));
        assert_eq!(parse("  /dm   alice  "), Some(Command::DirectMessage("alice".into())));
        assert_eq!(parse("/create Book Club"), Some(Command::Create("Book Club".into())));
        assert_eq!(parse("/j lobby"), Some(Command::Join("lobby".into())));
    }

    #[test]
    fn missing_argument() {
        assert_eq!(
            parse("/room"),
            Some(Command::MissingArgument { command: "room", expected: "room name" })
        );
        assert_eq!(parse("/dm   ").and_then(Command::into_event), None);
    }

    #[test]
    fn unknown_command() {
        assert_eq!(parse("/dance"), Some(Command::Unknown("dance".into())));
    }

    #[test]
    fn commands_map_to_events() {
        assert_eq!(parse("/leave").and_then(Command::into_event), Some(AppEvent::ClearSelection));
        assert_eq!(parse("/quit").and_then(Command::into_event), Some(AppEvent::Quit));
        assert_eq!(
            parse("/info general").and_then(Command::into_event),
            Some(AppEvent::RoomInfo("general".into()))
        );
    }
}
