//! Standard invariant checks.
//!
//! These invariants capture the connection lifecycle guarantees. They verify
//! WHAT must be true, not specific test scenarios.

use super::{Invariant, InvariantResult, SessionSnapshot, Violation};

/// At most one connection is live on the transport.
pub struct SingleLiveConnection;

impl Invariant for SingleLiveConnection {
    fn name(&self) -> &'static str {
        "single_live_connection"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        if state.live.len() > 1 {
            return Err(Violation {
                invariant: self.name(),
                message: format!("live connections {:?}", state.live),
            });
        }
        Ok(())
    }
}

/// A live connection is always the one the session owns.
///
/// A live connection the session no longer tracks would be a leak: it could
/// deliver messages for a context the user has left.
pub struct LiveConnectionIsOwned;

impl Invariant for LiveConnectionIsOwned {
    fn name(&self) -> &'static str {
        "live_connection_is_owned"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let owned = state.link.as_ref().map(|link| link.id);
        for id in &state.live {
            if Some(*id) != owned {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("connection {id} live but session owns {owned:?}"),
                });
            }
        }
        Ok(())
    }
}

/// The owned connection and any pending retry serve the active context.
pub struct ScopeMatchesContext;

impl Invariant for ScopeMatchesContext {
    fn name(&self) -> &'static str {
        "scope_matches_context"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        if let Some(link) = &state.link {
            if link.scope != state.context {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "connection {} scoped to {} while context is {}",
                        link.id, link.scope, state.context
                    ),
                });
            }
        }
        if let Some(scope) = &state.retry_scope {
            if *scope != state.context {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "retry pending for {scope} while context is {}",
                        state.context
                    ),
                });
            }
        }
        Ok(())
    }
}

/// With no context, nothing is open and nothing is scheduled.
pub struct IdleWithoutContext;

impl Invariant for IdleWithoutContext {
    fn name(&self) -> &'static str {
        "idle_without_context"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        if state.context.is_none() && (state.link.is_some() || state.retry_scope.is_some()) {
            return Err(Violation {
                invariant: self.name(),
                message: format!(
                    "no context but link {:?}, retry {:?}",
                    state.link, state.retry_scope
                ),
            });
        }
        Ok(())
    }
}

/// The local user never appears in the typing indicator.
pub struct NoSelfTypingIndicator;

impl Invariant for NoSelfTypingIndicator {
    fn name(&self) -> &'static str {
        "no_self_typing_indicator"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        if state.typing_indicator.as_deref() == Some(state.local_user.as_str()) {
            return Err(Violation {
                invariant: self.name(),
                message: format!("indicator shows local user {}", state.local_user),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use parley_core::Link;
    use parley_proto::Context;

    use super::*;

    fn link(id: u64, scope: Context) -> Link {
        Link { id, scope, endpoint: String::new() }
    }

    #[test]
    fn detects_two_live_connections() {
        let mut state = SessionSnapshot::idle("me");
        state.live = vec![1, 2];
        assert!(SingleLiveConnection.check(&state).is_err());
    }

    #[test]
    fn detects_leaked_connection() {
        let mut state = SessionSnapshot::idle("me");
        state.context = Context::room("b").unwrap();
        state.link = Some(link(2, Context::room("b").unwrap()));
        state.live = vec![1];
        assert!(LiveConnectionIsOwned.check(&state).is_err());

        state.live = vec![2];
        assert!(LiveConnectionIsOwned.check(&state).is_ok());
    }

    #[test]
    fn detects_scope_mismatch() {
        let mut state = SessionSnapshot::idle("me");
        state.context = Context::room("b").unwrap();
        state.link = Some(link(1, Context::room("a").unwrap()));
        assert!(ScopeMatchesContext.check(&state).is_err());

        state.link = None;
        state.retry_scope = Some(Context::room("a").unwrap());
        assert!(ScopeMatchesContext.check(&state).is_err());
    }

    #[test]
    fn detects_self_typing() {
        let mut state = SessionSnapshot::idle("me");
        state.typing_indicator = Some("me".into());
        assert!(NoSelfTypingIndicator.check(&state).is_err());
    }
}
