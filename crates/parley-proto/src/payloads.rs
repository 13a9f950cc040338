//! Directory and history payloads.
//!
//! These are the JSON bodies served by the chat service's HTTP side. Field
//! names on the wire follow the service (`is_user`, `profile_image`,
//! `username`, `message`); the Rust names describe what the fields mean to
//! the client.

use serde::{Deserialize, Serialize};

/// Room in the directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomEntry {
    /// Room name.
    pub name: String,
    /// Whether the local user has joined this room.
    #[serde(rename = "is_user", default)]
    pub is_member: bool,
}

/// User in the directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntry {
    /// Username.
    pub username: String,
    /// Avatar reference (URL path).
    #[serde(rename = "profile_image", default)]
    pub avatar: Option<String>,
}

/// One past message, as returned by the history endpoints.
///
/// History is ordered oldest to newest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Username of the author.
    #[serde(rename = "username")]
    pub sender: String,
    /// Message text.
    #[serde(rename = "message")]
    pub body: String,
    /// Avatar reference of the author.
    #[serde(rename = "profile_image", default)]
    pub avatar: Option<String>,
    /// ISO-8601 timestamp, when provided.
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Room details for the info panel.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoomInfo {
    /// Room name.
    pub room: String,
    /// Username of the creator, if known.
    #[serde(default)]
    pub created_by: Option<String>,
    /// Every member of the room.
    #[serde(default)]
    pub users: Vec<String>,
    /// Members with a live connection to the room right now.
    #[serde(default)]
    pub users_active: Vec<String>,
}

/// Body of a room creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    /// Requested room name.
    pub name: String,
}

/// Reply to a room creation request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateRoomReply {
    /// True if the room was created.
    #[serde(default)]
    pub success: bool,
    /// Canonical room name chosen by the service.
    #[serde(default)]
    pub room: Option<String>,
    /// Reason for failure.
    #[serde(default)]
    pub error: Option<String>,
}

/// Reply to a join request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JoinRoomReply {
    /// True if the local user is now a member.
    #[serde(default)]
    pub joined: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_list_uses_service_field_names() {
        let raw = r#"[{"name":"general","is_user":true},{"name":"random","is_user":false}]"#;
        let rooms: Vec<RoomEntry> = serde_json::from_str(raw).unwrap();
        assert_eq!(rooms, vec![
            RoomEntry { name: "general".into(), is_member: true },
            RoomEntry { name: "random".into(), is_member: false },
        ]);
    }

    #[test]
    fn history_entry_ignores_unknown_fields() {
        let raw = r#"{"username":"alice","message":"hi","timestamp":"2024-01-01T00:00:00",
            "profile_image":"/a.jpg","extra":1}"#;
        let entry: HistoryEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.sender, "alice");
        assert_eq!(entry.body, "hi");
        assert_eq!(entry.avatar.as_deref(), Some("/a.jpg"));
        assert_eq!(entry.timestamp.as_deref(), Some("2024-01-01T00:00:00"));
    }

    #[test]
    fn create_reply_error_shape() {
        let reply: CreateRoomReply =
            serde_json::from_str(r#"{"error":"Room already exists"}"#).unwrap();
        assert!(!reply.success);
        assert_eq!(reply.error.as_deref(), Some("Room already exists"));
    }

    #[test]
    fn room_info_defaults() {
        let info: RoomInfo = serde_json::from_str(r#"{"room":"general"}"#).unwrap();
        assert_eq!(info.created_by, None);
        assert!(info.users.is_empty());
        assert!(info.users_active.is_empty());
    }
}
