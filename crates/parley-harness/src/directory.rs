//! In-memory directory service.
//!
//! Answers [`DirectoryRequest`]s the way the chat service does: membership is
//! read from the room listing, room names are lowercased on create, joining
//! an unknown room fails.

use std::collections::HashMap;

use parley_app::{DirectoryRequest, DirectoryResponse};
use parley_proto::{Context, HistoryEntry, RoomEntry, RoomInfo, UserEntry};

/// In-memory directory for one local user.
#[derive(Debug, Clone, Default)]
pub struct SimDirectory {
    local_user: String,
    rooms: Vec<RoomEntry>,
    users: Vec<UserEntry>,
    history: HashMap<Context, Vec<HistoryEntry>>,
}

impl SimDirectory {
    /// Empty directory for `local_user`.
    pub fn new(local_user: impl Into<String>) -> Self {
        let local_user = local_user.into();
        let users = vec![UserEntry { username: local_user.clone(), avatar: None }];
        Self { local_user, rooms: Vec::new(), users, history: HashMap::new() }
    }

    /// Add a room.
    #[must_use]
    pub fn with_room(mut self, name: &str, is_member: bool) -> Self {
        self.rooms.push(RoomEntry { name: name.to_string(), is_member });
        self
    }

    /// Add a user.
    #[must_use]
    pub fn with_user(mut self, username: &str) -> Self {
        self.users.push(UserEntry { username: username.to_string(), avatar: None });
        self
    }

    /// Add a history entry for `context`.
    #[must_use]
    pub fn with_history(mut self, context: Context, sender: &str, body: &str) -> Self {
        self.history.entry(context).or_default().push(HistoryEntry {
            sender: sender.to_string(),
            body: body.to_string(),
            avatar: None,
            timestamp: None,
        });
        self
    }

    /// Whether the local user is a member of `room`.
    pub fn is_member(&self, room: &str) -> bool {
        self.rooms.iter().any(|entry| entry.name == room && entry.is_member)
    }

    /// Answer a request, updating state for joins and creates.
    pub fn answer(&mut self, request: &DirectoryRequest) -> DirectoryResponse {
        match request {
            DirectoryRequest::Rooms => DirectoryResponse::Rooms(self.rooms.clone()),
            DirectoryRequest::Users => DirectoryResponse::Users(self.users.clone()),
            DirectoryRequest::Membership { room } => {
                let is_member = self.is_member(room);
                DirectoryResponse::Membership { room: room.clone(), is_member }
            },
            DirectoryRequest::History { context } => DirectoryResponse::History {
                context: context.clone(),
                entries: self.history.get(context).cloned().unwrap_or_default(),
            },
            DirectoryRequest::Join { room } => {
                let entry = self.rooms.iter_mut().find(|entry| entry.name == *room);
                let ok = match entry {
                    Some(entry) => {
                        entry.is_member = true;
                        true
                    },
                    None => false,
                };
                DirectoryResponse::Joined { room: room.clone(), ok }
            },
            DirectoryRequest::Create { name } => {
                let canonical = name.trim().to_lowercase();
                let outcome = if canonical.is_empty() {
                    Err("Room name required".to_string())
                } else if self.rooms.iter().any(|entry| entry.name == canonical) {
                    Err("Room already exists".to_string())
                } else {
                    self.rooms.push(RoomEntry { name: canonical.clone(), is_member: true });
                    Ok(canonical)
                };
                DirectoryResponse::Created { requested: name.clone(), outcome }
            },
            DirectoryRequest::RoomInfo { room } => {
                let users =
                    if self.is_member(room) { vec![self.local_user.clone()] } else { Vec::new() };
                DirectoryResponse::RoomInfo(RoomInfo {
                    room: room.clone(),
                    created_by: None,
                    users,
                    users_active: Vec::new(),
                })
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_is_idempotent() {
        let mut directory = SimDirectory::new("me").with_room("general", true);
        let request = DirectoryRequest::Join { room: "general".into() };

        assert_eq!(directory.answer(&request), DirectoryResponse::Joined {
            room: "general".into(),
            ok: true
        });
        assert_eq!(directory.answer(&request), DirectoryResponse::Joined {
            room: "general".into(),
            ok: true
        });
        assert!(directory.is_member("general"));
    }

    #[test]
    fn create_lowercases_and_rejects_duplicates() {
        let mut directory = SimDirectory::new("me");
        let request = DirectoryRequest::Create { name: "Lobby".into() };

        assert_eq!(directory.answer(&request), DirectoryResponse::Created {
            requested: "Lobby".into(),
            outcome: Ok("lobby".into())
        });
        assert_eq!(directory.answer(&request), DirectoryResponse::Created {
            requested: "Lobby".into(),
            outcome: Err("Room already exists".into())
        });
    }
}
