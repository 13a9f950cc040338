//! Connection lifecycle state machine.
//!
//! Owns the one live connection a session may have. Uses the action pattern:
//! methods take time as input and return actions for the driver to execute,
//! so the state machine performs no I/O and runs unchanged under virtual time.
//!
//! # State Machine
//!
//! ```text
//!            reopen(ctx)            Opened
//!  ┌──────┐ ───────────> ┌────────────┐ ────────> ┌───────────┐
//!  │ Idle │              │ Connecting │           │ Connected │
//!  └──────┘              └────────────┘           └───────────┘
//!                              │ Closed                 │ Closed
//!                              ↓                        ↓
//!                        ┌──────────────┐  tick   ┌──────────┐
//!                        │ RetryPending │ ──────> │ Retrying │
//!                        └──────────────┘         └──────────┘
//!                              ↑       Closed          │ Opened
//!                              └───────────────────────┘──────> Connected
//!
//!  reopen(None) from anywhere ──> ClosedIntentional
//! ```
//!
//! # Retirement
//!
//! Every connection gets a fresh [`ConnectionId`]. Replacing or closing a
//! connection retires its id *before* the close is issued, so transport
//! events that arrive later for that id are recognised as stale and ignored.
//! A retired connection therefore never schedules a reconnect and never
//! delivers a message.

use std::time::Duration;

use parley_proto::{Context, Endpoint, InboundFrame, OutboundAction};

use crate::env::Timestamp;

/// Wait between an unexpected close and the reconnect attempt.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(2000);

/// Identity of one connection attempt.
///
/// Allocated monotonically; never reused within a session.
pub type ConnectionId = u64;

/// A connection the manager currently owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Connection identity.
    pub id: ConnectionId,
    /// Context the connection was opened for.
    pub scope: Context,
    /// Resolved WebSocket URL.
    pub endpoint: String,
}

/// Lifecycle state of the session's connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState<I> {
    /// Nothing opened yet.
    Idle,
    /// Open requested, waiting for the transport to confirm.
    Connecting {
        /// Connection being opened.
        link: Link,
    },
    /// Transport confirmed the connection.
    Connected {
        /// Live connection.
        link: Link,
    },
    /// The client closed its connection and wants no replacement.
    ClosedIntentional {
        /// Id of the connection that was closed.
        id: ConnectionId,
    },
    /// Connection was lost; a reconnect is scheduled.
    RetryPending {
        /// Context to reconnect to.
        scope: Context,
        /// Id of the lost connection.
        lost: ConnectionId,
        /// When the reconnect fires.
        retry_at: I,
        /// Number of the upcoming attempt, starting at 1.
        attempt: u32,
    },
    /// Reconnect issued, waiting for the transport to confirm.
    Retrying {
        /// Replacement connection.
        link: Link,
        /// Attempt number.
        attempt: u32,
    },
}

/// Coarse link status shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// No connection and none wanted.
    Offline,
    /// First connection to the current context in progress.
    Connecting,
    /// Connected.
    Connected,
    /// Connection lost; reconnecting.
    Reconnecting {
        /// Attempt number.
        attempt: u32,
    },
}

/// Actions returned by the connection manager.
///
/// The driver executes these:
/// - `Open`: start a WebSocket connection to `endpoint` tagged with `id`
/// - `Close`: close connection `id` without reporting it as lost
/// - `Send`: write `text` on connection `id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionAction {
    /// Open a connection.
    Open {
        /// Identity the driver must tag every event for this connection with.
        id: ConnectionId,
        /// WebSocket URL.
        endpoint: String,
        /// Context the connection serves.
        scope: Context,
    },
    /// Close a connection.
    Close {
        /// Connection to close.
        id: ConnectionId,
    },
    /// Send a text frame.
    Send {
        /// Connection to write on.
        id: ConnectionId,
        /// Encoded frame.
        text: String,
    },
}

/// Events reported by the transport for a specific connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Handshake completed.
    Opened {
        /// Connection.
        id: ConnectionId,
    },
    /// Text frame received.
    Text {
        /// Connection.
        id: ConnectionId,
        /// Raw payload.
        text: String,
    },
    /// Connection ended. Always the last event for an id.
    Closed {
        /// Connection.
        id: ConnectionId,
    },
    /// Transport-level error. Informational; a `Closed` follows.
    Failed {
        /// Connection.
        id: ConnectionId,
        /// Human-readable cause.
        reason: String,
    },
}

impl TransportEvent {
    /// Connection the event belongs to.
    pub fn id(&self) -> ConnectionId {
        match self {
            Self::Opened { id }
            | Self::Text { id, .. }
            | Self::Closed { id }
            | Self::Failed { id, .. } => *id,
        }
    }
}

/// Connection manager configuration
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Delay before reconnecting after an unexpected close
    pub reconnect_delay: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self { reconnect_delay: DEFAULT_RECONNECT_DELAY }
    }
}

/// Connection lifecycle manager
///
/// Guarantees at most one connection is live at any time, that the live
/// connection always serves the latest requested context, and that only the
/// live connection can schedule a reconnect.
///
/// Generic over the instant type to support both real time and virtual time.
#[derive(Debug, Clone)]
pub struct ConnectionManager<I> {
    state: LinkState<I>,
    endpoint: Endpoint,
    config: ConnectionConfig,
    next_id: ConnectionId,
}

impl<I: Timestamp> ConnectionManager<I> {
    /// Create a manager in [`LinkState::Idle`].
    pub fn new(endpoint: Endpoint, config: ConnectionConfig) -> Self {
        Self { state: LinkState::Idle, endpoint, config, next_id: 1 }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> &LinkState<I> {
        &self.state
    }

    /// Configuration in use.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// The connection the manager currently owns, open or opening.
    pub fn link(&self) -> Option<&Link> {
        match &self.state {
            LinkState::Connecting { link }
            | LinkState::Connected { link }
            | LinkState::Retrying { link, .. } => Some(link),
            _ => None,
        }
    }

    /// Context the manager is serving or will reconnect to.
    pub fn scope(&self) -> Option<&Context> {
        match &self.state {
            LinkState::RetryPending { scope, .. } => Some(scope),
            _ => self.link().map(|link| &link.scope),
        }
    }

    /// True when the owned connection has completed its handshake.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.state, LinkState::Connected { .. })
    }

    /// Time at which [`Self::tick`] next has work to do.
    pub fn next_deadline(&self) -> Option<I> {
        match &self.state {
            LinkState::RetryPending { retry_at, .. } => Some(*retry_at),
            _ => None,
        }
    }

    /// Status summary for display.
    pub fn status(&self) -> LinkStatus {
        match &self.state {
            LinkState::Idle | LinkState::ClosedIntentional { .. } => LinkStatus::Offline,
            LinkState::Connecting { .. } => LinkStatus::Connecting,
            LinkState::Connected { .. } => LinkStatus::Connected,
            LinkState::RetryPending { attempt, .. } | LinkState::Retrying { attempt, .. } => {
                LinkStatus::Reconnecting { attempt: *attempt }
            },
        }
    }

    /// Point the session at `context`.
    ///
    /// Cancels any scheduled reconnect, retires and closes the owned
    /// connection, then opens a new one for `context`. For
    /// [`Context::None`] nothing is opened and the manager settles in
    /// [`LinkState::ClosedIntentional`].
    pub fn reopen(&mut self, context: &Context) -> Vec<ConnectionAction> {
        let mut actions = Vec::new();
        let mut settled = LinkState::Idle;

        match std::mem::replace(&mut self.state, LinkState::Idle) {
            LinkState::Connecting { link }
            | LinkState::Connected { link }
            | LinkState::Retrying { link, .. } => {
                tracing::debug!(id = link.id, scope = %link.scope, "closing connection");
                actions.push(ConnectionAction::Close { id: link.id });
                settled = LinkState::ClosedIntentional { id: link.id };
            },
            LinkState::RetryPending { scope, lost, attempt, .. } => {
                tracing::debug!(lost, %scope, attempt, "cancelled pending reconnect");
                settled = LinkState::ClosedIntentional { id: lost };
            },
            LinkState::ClosedIntentional { id } => {
                settled = LinkState::ClosedIntentional { id };
            },
            LinkState::Idle => {},
        }

        let Some(endpoint) = self.endpoint.url_for(context) else {
            self.state = settled;
            return actions;
        };

        let link = self.allocate(context.clone(), endpoint);
        tracing::info!(id = link.id, scope = %link.scope, "opening connection");
        actions.push(ConnectionAction::Open {
            id: link.id,
            endpoint: link.endpoint.clone(),
            scope: link.scope.clone(),
        });
        self.state = LinkState::Connecting { link };

        actions
    }

    /// Close the owned connection for good.
    pub fn shutdown(&mut self) -> Vec<ConnectionAction> {
        self.reopen(&Context::None)
    }

    /// Process a transport event.
    ///
    /// Events for any id other than the owned connection's are ignored.
    /// Returns the decoded frame for a well-formed text event on the owned
    /// connection; malformed payloads are dropped.
    pub fn handle_event(&mut self, event: TransportEvent, now: I) -> Option<InboundFrame> {
        let id = event.id();
        if self.link().map(|link| link.id) != Some(id) {
            tracing::trace!(id, "ignoring event for retired connection");
            return None;
        }

        match event {
            TransportEvent::Opened { .. } => {
                self.promote();
                None
            },
            TransportEvent::Text { text, .. } => InboundFrame::parse(&text),
            TransportEvent::Failed { reason, .. } => {
                tracing::warn!(id, %reason, "transport error");
                None
            },
            TransportEvent::Closed { .. } => {
                self.lost(now);
                None
            },
        }
    }

    /// Fire a due reconnect.
    ///
    /// Must be called at least once at or after [`Self::next_deadline`].
    pub fn tick(&mut self, now: I) -> Vec<ConnectionAction> {
        match &self.state {
            LinkState::RetryPending { retry_at, .. } if now >= *retry_at => {},
            _ => return Vec::new(),
        }

        let LinkState::RetryPending { scope, attempt, .. } =
            std::mem::replace(&mut self.state, LinkState::Idle)
        else {
            return Vec::new();
        };

        let Some(endpoint) = self.endpoint.url_for(&scope) else {
            return Vec::new();
        };

        let link = self.allocate(scope, endpoint);
        tracing::info!(id = link.id, scope = %link.scope, attempt, "reconnecting");
        let action = ConnectionAction::Open {
            id: link.id,
            endpoint: link.endpoint.clone(),
            scope: link.scope.clone(),
        };
        self.state = LinkState::Retrying { link, attempt };

        vec![action]
    }

    /// Build a send on the live connection.
    ///
    /// Returns `None` unless a connection is open, or when the action encodes
    /// to nothing (blank message).
    pub fn send(&self, action: &OutboundAction) -> Option<ConnectionAction> {
        let LinkState::Connected { link } = &self.state else {
            return None;
        };
        let text = action.encode()?;
        Some(ConnectionAction::Send { id: link.id, text })
    }

    fn allocate(&mut self, scope: Context, endpoint: String) -> Link {
        let id = self.next_id;
        self.next_id += 1;
        Link { id, scope, endpoint }
    }

    fn promote(&mut self) {
        match std::mem::replace(&mut self.state, LinkState::Idle) {
            LinkState::Connecting { link } | LinkState::Retrying { link, .. } => {
                tracing::info!(id = link.id, scope = %link.scope, "connected");
                self.state = LinkState::Connected { link };
            },
            other => self.state = other,
        }
    }

    fn lost(&mut self, now: I) {
        let (link, attempt) = match std::mem::replace(&mut self.state, LinkState::Idle) {
            LinkState::Connecting { link } | LinkState::Connected { link } => (link, 0),
            LinkState::Retrying { link, attempt } => (link, attempt),
            other => {
                self.state = other;
                return;
            },
        };

        let retry_at = now + self.config.reconnect_delay;
        let attempt = attempt.saturating_add(1);
        tracing::warn!(
            id = link.id,
            scope = %link.scope,
            attempt,
            delay_ms = self.config.reconnect_delay.as_millis() as u64,
            "connection lost, reconnect scheduled"
        );
        self.state =
            LinkState::RetryPending { scope: link.scope, lost: link.id, retry_at, attempt };
    }
}
