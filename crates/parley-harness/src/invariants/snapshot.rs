//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of the session and the transport at
//! a point in time. Invariants operate on snapshots rather than live state to
//! ensure consistent, atomic checks.

use parley_app::App;
use parley_core::{ConnectionId, Link, LinkState, Timestamp};
use parley_proto::Context;

use crate::SimDriver;

/// Snapshot of one session and its driver.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// Active context.
    pub context: Context,
    /// Connection the session owns, open or opening.
    pub link: Option<Link>,
    /// Context a pending reconnect would open, if one is scheduled.
    pub retry_scope: Option<Context>,
    /// Connections live on the transport side.
    pub live: Vec<ConnectionId>,
    /// Typing indicator as displayed.
    pub typing_indicator: Option<String>,
    /// Local username.
    pub local_user: String,
}

impl SessionSnapshot {
    /// Snapshot of a session that has done nothing yet.
    pub fn idle(local_user: &str) -> Self {
        Self {
            context: Context::None,
            link: None,
            retry_scope: None,
            live: Vec::new(),
            typing_indicator: None,
            local_user: local_user.to_string(),
        }
    }

    /// Capture the session and the driver's view of the transport.
    pub fn capture<I: Timestamp>(app: &App<I>, driver: &SimDriver) -> Self {
        let retry_scope = match app.connection().state() {
            LinkState::RetryPending { scope, .. } => Some(scope.clone()),
            _ => None,
        };

        Self {
            context: app.context().clone(),
            link: app.connection().link().cloned(),
            retry_scope,
            live: driver.recording().live.clone(),
            typing_indicator: driver.view().typing.clone(),
            local_user: app.config().local_user.clone(),
        }
    }
}
