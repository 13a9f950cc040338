//! JSON frames exchanged over a live connection.
//!
//! Outbound, the client sends either chat text or a typing signal. The server
//! attaches the sender identity from the authenticated connection, so neither
//! shape carries a username.
//!
//! ```text
//! {"message": "hello"}
//! {"type": "typing", "typing": true}
//! ```
//!
//! Inbound, the server broadcasts chat messages, typing signals and presence
//! changes. Every inbound frame names its sender in `username`; a frame
//! without one is malformed.
//!
//! ```text
//! {"type": "chat_message", "username": "alice", "message": "hi", "profile_image": "/a.jpg"}
//! {"type": "typing_event", "username": "alice", "typing": false}
//! {"type": "presence_event", "username": "alice", "status": "online"}
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{ProtocolError, Result};

const TYPING: &str = "typing";
const TYPING_EVENT: &str = "typing_event";
const PRESENCE_EVENT: &str = "presence_event";
const STATUS_ONLINE: &str = "online";
const STATUS_OFFLINE: &str = "offline";

/// Action sent from the client over the live connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundAction {
    /// Chat text for the current context.
    Message {
        /// Text as typed; surrounding whitespace is trimmed on encode.
        body: String,
    },
    /// Local typing state changed.
    Typing {
        /// Whether the local user is typing.
        is_typing: bool,
    },
}

#[derive(Serialize)]
#[serde(untagged)]
enum WireOutbound<'a> {
    Message {
        message: &'a str,
    },
    Typing {
        #[serde(rename = "type")]
        kind: &'static str,
        typing: bool,
    },
}

impl OutboundAction {
    /// Chat message action.
    pub fn message(body: impl Into<String>) -> Self {
        Self::Message { body: body.into() }
    }

    /// Typing signal action.
    pub fn typing(is_typing: bool) -> Self {
        Self::Typing { is_typing }
    }

    /// Serialize to the wire format.
    ///
    /// Returns `None` for a message whose text is empty after trimming; such
    /// sends are dropped before they reach the transport.
    pub fn encode(&self) -> Option<String> {
        let wire = match self {
            Self::Message { body } => {
                let body = body.trim();
                if body.is_empty() {
                    return None;
                }
                WireOutbound::Message { message: body }
            },
            Self::Typing { is_typing } => WireOutbound::Typing { kind: TYPING, typing: *is_typing },
        };

        serde_json::to_string(&wire).ok()
    }
}

/// Frame received from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    /// Chat message for the current context.
    Message {
        /// Username of the author.
        sender: String,
        /// Message text.
        body: String,
        /// Avatar reference (URL path), if the server sent one.
        avatar: Option<String>,
    },
    /// Someone started or stopped typing.
    Typing {
        /// Username of the typist.
        sender: String,
        /// Whether they are typing.
        is_typing: bool,
    },
    /// Someone connected to or disconnected from the current context.
    Presence {
        /// Username whose presence changed.
        sender: String,
        /// True for online, false for offline.
        online: bool,
        /// Avatar reference, if the server sent one.
        avatar: Option<String>,
    },
}

#[derive(Deserialize)]
struct WireInbound {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    typing: Option<bool>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    profile_image: Option<String>,
}

impl InboundFrame {
    /// Decode a raw text payload.
    ///
    /// Frames without a `type` are treated as chat messages when they carry
    /// `message`. A typing frame without `typing` means "is typing", matching
    /// what the server assumes for the same omission.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::Json` if the payload is not a JSON object of the
    ///   expected shape
    /// - `ProtocolError::MissingField` if `username` is absent, or the fields
    ///   the frame type needs are absent
    pub fn decode(raw: &str) -> Result<Self> {
        let wire: WireInbound = serde_json::from_str(raw)?;

        let sender = wire
            .username
            .filter(|name| !name.is_empty())
            .ok_or(ProtocolError::MissingField("username"))?;

        match wire.kind.as_deref() {
            Some(TYPING | TYPING_EVENT) => {
                Ok(Self::Typing { sender, is_typing: wire.typing.unwrap_or(true) })
            },
            Some(PRESENCE_EVENT) => {
                let online = match wire.status.as_deref() {
                    Some(STATUS_ONLINE) => true,
                    Some(STATUS_OFFLINE) => false,
                    _ => return Err(ProtocolError::MissingField("status")),
                };
                Ok(Self::Presence { sender, online, avatar: wire.profile_image })
            },
            _ => match wire.message {
                Some(body) if !body.is_empty() => {
                    Ok(Self::Message { sender, body, avatar: wire.profile_image })
                },
                _ => Err(ProtocolError::MissingField("message")),
            },
        }
    }

    /// Decode a raw payload, dropping it if malformed.
    ///
    /// Malformed frames are expected noise from the network; they are logged
    /// at debug level and otherwise ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        match Self::decode(raw) {
            Ok(frame) => Some(frame),
            Err(error) => {
                tracing::debug!(%error, "dropping malformed frame");
                None
            },
        }
    }

    /// Username the frame originates from.
    pub fn sender(&self) -> &str {
        match self {
            Self::Message { sender, .. }
            | Self::Typing { sender, .. }
            | Self::Presence { sender, .. } => sender,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_message_trims() {
        let action = OutboundAction::message("  hello  ");
        assert_eq!(action.encode().as_deref(), Some(r#"{"message":"hello"}"#));
    }

    #[test]
    fn encode_blank_message_is_none() {
        assert_eq!(OutboundAction::message("").encode(), None);
        assert_eq!(OutboundAction::message(" \n\t ").encode(), None);
    }

    #[test]
    fn encode_typing() {
        assert_eq!(
            OutboundAction::typing(true).encode().as_deref(),
            Some(r#"{"type":"typing","typing":true}"#)
        );
        assert_eq!(
            OutboundAction::typing(false).encode().as_deref(),
            Some(r#"{"type":"typing","typing":false}"#)
        );
    }

    #[test]
    fn decode_room_message() {
        let raw = r#"{"type":"chat_message","username":"alice","message":"hi",
            "profile_image":"/media/a.jpg"}"#;
        assert_eq!(InboundFrame::decode(raw).unwrap(), InboundFrame::Message {
            sender: "alice".into(),
            body: "hi".into(),
            avatar: Some("/media/a.jpg".into()),
        });
    }

    #[test]
    fn decode_untyped_message() {
        let raw = r#"{"username":"bob","message":"yo"}"#;
        assert_eq!(InboundFrame::decode(raw).unwrap(), InboundFrame::Message {
            sender: "bob".into(),
            body: "yo".into(),
            avatar: None,
        });
    }

    #[test]
    fn decode_typing_defaults_true() {
        let raw = r#"{"type":"typing_event","username":"bob"}"#;
        assert_eq!(InboundFrame::decode(raw).unwrap(), InboundFrame::Typing {
            sender: "bob".into(),
            is_typing: true,
        });

        let raw = r#"{"type":"typing_event","username":"bob","typing":false}"#;
        assert_eq!(InboundFrame::decode(raw).unwrap(), InboundFrame::Typing {
            sender: "bob".into(),
            is_typing: false,
        });
    }

    #[test]
    fn decode_presence() {
        let raw = r#"{"type":"presence_event","username":"carol","status":"offline"}"#;
        assert_eq!(InboundFrame::decode(raw).unwrap(), InboundFrame::Presence {
            sender: "carol".into(),
            online: false,
            avatar: None,
        });

        let raw = r#"{"type":"presence_event","username":"carol","status":"away"}"#;
        assert_eq!(InboundFrame::decode(raw), Err(ProtocolError::MissingField("status")));
    }

    #[test]
    fn missing_username_is_malformed() {
        let raw = r#"{"type":"chat_message","message":"hi"}"#;
        assert_eq!(InboundFrame::decode(raw), Err(ProtocolError::MissingField("username")));

        let raw = r#"{"username":"","message":"hi"}"#;
        assert_eq!(InboundFrame::decode(raw), Err(ProtocolError::MissingField("username")));
    }

    #[test]
    fn non_json_is_malformed() {
        assert!(matches!(InboundFrame::decode("not json"), Err(ProtocolError::Json(_))));
        assert!(matches!(InboundFrame::decode("[1,2]"), Err(ProtocolError::Json(_))));
        assert!(matches!(InboundFrame::decode(""), Err(ProtocolError::Json(_))));
    }

    #[test]
    fn empty_message_is_malformed() {
        let raw = r#"{"type":"chat_message","username":"alice","message":""}"#;
        assert_eq!(InboundFrame::decode(raw), Err(ProtocolError::MissingField("message")));
    }

    #[test]
    fn parse_drops_malformed() {
        assert_eq!(InboundFrame::parse("not json"), None);
        assert_eq!(InboundFrame::parse(r#"{"message":"hi"}"#), None);
        assert!(InboundFrame::parse(r#"{"username":"a","message":"hi"}"#).is_some());
    }

    #[test]
    fn sender_accessor() {
        let frame = InboundFrame::Typing { sender: "dave".into(), is_typing: true };
        assert_eq!(frame.sender(), "dave");
    }
}
