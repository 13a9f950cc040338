//! Directory requests over HTTP.
//!
//! Maps each [`DirectoryRequest`] onto the matching [`HttpDirectory`] call.
//! Failures never surface as errors: a failed listing reads as empty, a
//! failed join or create as refused, so every request gets exactly one
//! answer and navigation never blocks on the service.

use parley_app::{DirectoryRequest, DirectoryResponse};
use parley_client::{HttpDirectory, TransportError};
use parley_proto::RoomInfo;

/// Perform `request` and produce the session's answer.
pub async fn answer(directory: &HttpDirectory, request: DirectoryRequest) -> DirectoryResponse {
    match request {
        DirectoryRequest::Rooms => {
            DirectoryResponse::Rooms(or_empty("rooms", directory.rooms().await))
        },
        DirectoryRequest::Users => {
            DirectoryResponse::Users(or_empty("users", directory.users().await))
        },
        DirectoryRequest::Membership { room } => {
            let is_member = or_empty("membership", directory.is_member(&room).await);
            DirectoryResponse::Membership { room, is_member }
        },
        DirectoryRequest::History { context } => {
            let entries = or_empty("history", directory.history(&context).await);
            DirectoryResponse::History { context, entries }
        },
        DirectoryRequest::Join { room } => {
            let ok = or_empty("join", directory.join(&room).await);
            DirectoryResponse::Joined { room, ok }
        },
        DirectoryRequest::Create { name } => {
            let outcome = created(directory.create(&name).await);
            DirectoryResponse::Created { requested: name, outcome }
        },
        DirectoryRequest::RoomInfo { room } => {
            let info = directory.room_info(&room).await.unwrap_or_else(|error| {
                tracing::warn!(%room, %error, "room info request failed");
                RoomInfo {
                    room: room.clone(),
                    created_by: None,
                    users: Vec::new(),
                    users_active: Vec::new(),
                }
            });
            DirectoryResponse::RoomInfo(info)
        },
    }
}

fn or_empty<T: Default>(what: &'static str, result: Result<T, TransportError>) -> T {
    result.unwrap_or_else(|error| {
        tracing::warn!(request = what, %error, "directory request failed");
        T::default()
    })
}

fn created(result: Result<String, TransportError>) -> Result<String, String> {
    result.map_err(|error| match error {
        TransportError::Rejected(reason) => reason,
        other => {
            tracing::warn!(error = %other, "create request failed");
            other.to_string()
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_degrade_to_defaults() {
        let rooms: Vec<parley_proto::RoomEntry> = or_empty("rooms", Err(TransportError::Closed));
        assert!(rooms.is_empty());
        assert!(!or_empty("join", Err(TransportError::Closed)));
        assert!(or_empty("join", Ok(true)));
    }

    #[test]
    fn rejection_reason_is_kept() {
        assert_eq!(
            created(Err(TransportError::Rejected("Room already exists".into()))),
            Err("Room already exists".to_string())
        );
        assert_eq!(created(Ok("lobby".into())), Ok("lobby".to_string()));
        assert_eq!(created(Err(TransportError::Closed)), Err("connection closed".to_string()));
    }

    #[tokio::test]
    async fn unreachable_service_still_answers() {
        let directory = HttpDirectory::new("http://127.0.0.1:9", None).unwrap();

        let reply = answer(&directory, DirectoryRequest::Join { room: "general".into() }).await;
        assert_eq!(reply, DirectoryResponse::Joined { room: "general".into(), ok: false });

        let reply = answer(&directory, DirectoryRequest::Rooms).await;
        assert_eq!(reply, DirectoryResponse::Rooms(Vec::new()));
    }
}
