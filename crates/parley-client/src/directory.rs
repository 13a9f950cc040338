//! HTTP client for the directory and history endpoints.
//!
//! ```text
//! GET  /chat/rooms/                 -> [{name, is_user}]
//! GET  /chat/users/                 -> [{username, profile_image}]
//! GET  /chat/history/<room>/        -> [{username, message, timestamp, profile_image}]
//! GET  /chat/dm/history/<peer>/     -> same shape as room history
//! GET  /chat/rooms/join/<room>/
//! POST /chat/rooms/create/ {name}   -> {success, room} | {error}
//! GET  /chat/rooms/info/<room>/     -> {room, created_by, users, users_active}
//! ```

use parley_proto::{
    Context, CreateRoomReply, CreateRoomRequest, HistoryEntry, JoinRoomReply, RoomEntry, RoomInfo,
    UserEntry,
};
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use crate::TransportError;

/// Directory and history client.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    client: reqwest::Client,
    base: String,
}

impl HttpDirectory {
    /// Client for the service at `base` (e.g. `http://127.0.0.1:8000`).
    ///
    /// `cookie` is forwarded verbatim as the `Cookie` header on every
    /// request.
    ///
    /// # Errors
    ///
    /// - `TransportError::Cookie` if `cookie` is not a valid header value
    /// - `TransportError::Http` if the HTTP client cannot be built
    pub fn new(base: &str, cookie: Option<&str>) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = cookie {
            let value =
                HeaderValue::from_str(cookie).map_err(|e| TransportError::Cookie(e.to_string()))?;
            headers.insert(COOKIE, value);
        }

        let client = reqwest::Client::builder().default_headers(headers).build()?;
        Ok(Self { client, base: base.trim_end_matches('/').to_string() })
    }

    /// Base URL requests are made against.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// All rooms, with the local user's membership.
    ///
    /// # Errors
    ///
    /// - `TransportError::Http` on network failure, error status or bad body
    pub async fn rooms(&self) -> Result<Vec<RoomEntry>, TransportError> {
        self.get("/chat/rooms/").await
    }

    /// All users.
    ///
    /// # Errors
    ///
    /// - `TransportError::Http` on network failure, error status or bad body
    pub async fn users(&self) -> Result<Vec<UserEntry>, TransportError> {
        self.get("/chat/users/").await
    }

    /// Whether the local user is a member of `room`.
    ///
    /// Answered from the room listing; a room missing from it counts as not
    /// joined.
    ///
    /// # Errors
    ///
    /// - `TransportError::Http` on network failure, error status or bad body
    pub async fn is_member(&self, room: &str) -> Result<bool, TransportError> {
        let rooms = self.rooms().await?;
        Ok(rooms.iter().any(|entry| entry.name == room && entry.is_member))
    }

    /// Message history for a context, oldest first.
    ///
    /// [`Context::None`] has no history.
    ///
    /// # Errors
    ///
    /// - `TransportError::Http` on network failure, error status or bad body
    pub async fn history(&self, context: &Context) -> Result<Vec<HistoryEntry>, TransportError> {
        match history_path(context) {
            Some(path) => self.get(&path).await,
            None => Ok(Vec::new()),
        }
    }

    /// Join `room`. Returns whether the service reports the local user as a
    /// member afterwards.
    ///
    /// # Errors
    ///
    /// - `TransportError::Http` on network failure, error status (unknown
    ///   room) or bad body
    pub async fn join(&self, room: &str) -> Result<bool, TransportError> {
        let reply: JoinRoomReply =
            self.get(&format!("/chat/rooms/join/{}/", urlencoding::encode(room))).await?;
        Ok(reply.joined)
    }

    /// Create a room named `name`.
    ///
    /// Returns the canonical name chosen by the service, which may differ
    /// from `name` (the service lowercases it).
    ///
    /// # Errors
    ///
    /// - `TransportError::Rejected` if the service refused, with its reason
    /// - `TransportError::Http` on network failure or bad body
    pub async fn create(&self, name: &str) -> Result<String, TransportError> {
        let body = CreateRoomRequest { name: name.to_string() };
        let url = self.url("/chat/rooms/create/");
        let reply: CreateRoomReply = self.client.post(url).json(&body).send().await?.json().await?;
        created_name(reply, name)
    }

    /// Details for `room`.
    ///
    /// # Errors
    ///
    /// - `TransportError::Http` on network failure, error status or bad body
    pub async fn room_info(&self, room: &str) -> Result<RoomInfo, TransportError> {
        self.get(&format!("/chat/rooms/info/{}/", urlencoding::encode(room))).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        let response = self.client.get(self.url(path)).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }
}

fn history_path(context: &Context) -> Option<String> {
    match context {
        Context::Room(room) => Some(format!("/chat/history/{}/", urlencoding::encode(room))),
        Context::DirectMessage(peer) => {
            Some(format!("/chat/dm/history/{}/", urlencoding::encode(peer)))
        },
        Context::None => None,
    }
}

fn created_name(reply: CreateRoomReply, requested: &str) -> Result<String, TransportError> {
    if reply.success {
        return Ok(reply.room.unwrap_or_else(|| requested.to_lowercase()));
    }
    Err(TransportError::Rejected(reply.error.unwrap_or_else(|| "room not created".to_string())))
}
