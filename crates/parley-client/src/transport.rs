//! WebSocket transport for the client.
//!
//! Provides [`SocketHandle`], a handle to one connection task. The task owns
//! the socket, forwards queued text frames to the server and reports every
//! lifecycle change as a [`TransportEvent`] tagged with the connection's id.
//! Protocol logic remains in the sans-IO core.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use parley_core::{ConnectionId, TransportEvent};
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{
        Message,
        client::IntoClientRequest,
        handshake::client::Request,
        http::{HeaderValue, header::COOKIE},
    },
};

use crate::TransportError;

/// Outbound frames buffered per connection before sends are refused.
const OUTBOUND_QUEUE: usize = 32;

/// Longest the WebSocket handshake may take before the attempt counts as
/// failed.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Handle to a running connection task.
pub struct SocketHandle {
    id: ConnectionId,
    to_server: mpsc::Sender<String>,
    abort_handle: tokio::task::AbortHandle,
}

impl SocketHandle {
    /// Connection id the task reports events with.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue a text frame for the server.
    ///
    /// # Errors
    ///
    /// - `TransportError::Closed` if the task has ended or its queue is full
    pub fn send(&self, text: String) -> Result<(), TransportError> {
        self.to_server.try_send(text).map_err(|_| TransportError::Closed)
    }

    /// Close gracefully: the task sends a close frame and reports `Closed`.
    pub fn close(self) {
        drop(self.to_server);
    }

    /// Stop the connection task immediately. No further events are reported.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

/// Spawn a task that connects to `url` and reports on `events`.
///
/// The task always ends with exactly one [`TransportEvent::Closed`] unless it
/// is stopped. A connect failure reports `Failed` then `Closed`, the same
/// way a dropped connection does, so the caller has one path for both.
///
/// A handshake that does not finish within `connect_timeout` is reported
/// the same way.
///
/// Must be called from within a tokio runtime.
pub fn spawn_connection(
    id: ConnectionId,
    url: String,
    cookie: Option<String>,
    connect_timeout: Duration,
    events: mpsc::Sender<TransportEvent>,
) -> SocketHandle {
    let (to_server, outbound) = mpsc::channel(OUTBOUND_QUEUE);
    let task = run_connection(id, url, cookie, connect_timeout, outbound, events);
    let handle = tokio::spawn(task);
    SocketHandle { id, to_server, abort_handle: handle.abort_handle() }
}

/// Build the handshake request, attaching the session cookie if any.
///
/// # Errors
///
/// - `TransportError::Connection` if `url` is not a valid WebSocket URL
/// - `TransportError::Cookie` if `cookie` is not a valid header value
pub(crate) fn handshake_request(
    url: &str,
    cookie: Option<&str>,
) -> Result<Request, TransportError> {
    let mut request =
        url.into_client_request().map_err(|e| TransportError::Connection(e.to_string()))?;

    if let Some(cookie) = cookie {
        let value =
            HeaderValue::from_str(cookie).map_err(|e| TransportError::Cookie(e.to_string()))?;
        request.headers_mut().insert(COOKIE, value);
    }

    Ok(request)
}

/// Run the connection, bridging between the channels and the socket.
async fn run_connection(
    id: ConnectionId,
    url: String,
    cookie: Option<String>,
    connect_timeout: Duration,
    mut outbound: mpsc::Receiver<String>,
    events: mpsc::Sender<TransportEvent>,
) {
    let pumped =
        connect_and_pump(id, &url, cookie.as_deref(), connect_timeout, &mut outbound, &events);
    if let Err(e) = pumped.await {
        tracing::debug!(id, %url, error = %e, "connection ended with error");
        let _ = events.send(TransportEvent::Failed { id, reason: e.to_string() }).await;
    }
    let _ = events.send(TransportEvent::Closed { id }).await;
}

async fn connect_and_pump(
    id: ConnectionId,
    url: &str,
    cookie: Option<&str>,
    connect_timeout: Duration,
    outbound: &mut mpsc::Receiver<String>,
    events: &mpsc::Sender<TransportEvent>,
) -> Result<(), TransportError> {
    let request = handshake_request(url, cookie)?;
    let (stream, _) = tokio::time::timeout(connect_timeout, connect_async(request))
        .await
        .map_err(|_| TransportError::Connection("handshake timed out".to_string()))?
        .map_err(|e| TransportError::Connection(e.to_string()))?;

    tracing::debug!(id, %url, "websocket open");
    events.send(TransportEvent::Opened { id }).await.map_err(|_| TransportError::Closed)?;

    let (mut write, mut read) = stream.split();

    loop {
        tokio::select! {
            queued = outbound.recv() => match queued {
                Some(text) => {
                    write
                        .send(Message::Text(text))
                        .await
                        .map_err(|e| TransportError::Connection(e.to_string()))?;
                },
                None => {
                    let _ = write.close().await;
                    return Ok(());
                },
            },
            incoming = read.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    events
                        .send(TransportEvent::Text { id, text })
                        .await
                        .map_err(|_| TransportError::Closed)?;
                },
                Some(Ok(Message::Close(frame))) => {
                    tracing::debug!(id, ?frame, "server closed connection");
                    return Ok(());
                },
                Some(Ok(_)) => {},
                Some(Err(e)) => return Err(TransportError::Connection(e.to_string())),
                None => return Ok(()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handshake_carries_cookie() {
        let request =
            handshake_request("ws://localhost:8000/ws/chat/general/", Some("sessionid=abc"))
                .unwrap();
        assert_eq!(request.uri().path(), "/ws/chat/general/");
        assert_eq!(request.headers().get(COOKIE).unwrap(), "sessionid=abc");
    }

    #[test]
    fn handshake_without_cookie() {
        let request = handshake_request("wss://chat.example.com/ws/dm/bob/", None).unwrap();
        assert!(request.headers().get(COOKIE).is_none());
    }

    #[test]
    fn handshake_rejects_bad_input() {
        assert!(matches!(
            handshake_request("not a url", None),
            Err(TransportError::Connection(_))
        ));
        assert!(matches!(
            handshake_request("ws://localhost:8000/", Some("bad\ncookie")),
            Err(TransportError::Cookie(_))
        ));
    }

    #[tokio::test]
    async fn connect_failure_reports_failed_then_closed() {
        let (tx, mut rx) = mpsc::channel(8);
        let _handle = spawn_connection(7, "not a url".into(), None, CONNECT_TIMEOUT, tx);

        assert!(matches!(rx.recv().await, Some(TransportEvent::Failed { id: 7, .. })));
        assert_eq!(rx.recv().await, Some(TransportEvent::Closed { id: 7 }));
    }

    #[tokio::test]
    async fn stalled_handshake_times_out() {
        // Accepts the TCP connection but never answers the upgrade.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(socket);
        });

        let (tx, mut rx) = mpsc::channel(8);
        let url = format!("ws://{addr}/ws/chat/general/");
        let _handle = spawn_connection(3, url, None, Duration::from_millis(100), tx);

        let failed = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await.unwrap();
        assert!(matches!(
            failed,
            Some(TransportEvent::Failed { id: 3, reason }) if reason.contains("timed out")
        ));
        assert_eq!(rx.recv().await, Some(TransportEvent::Closed { id: 3 }));
        server.abort();
    }
}
