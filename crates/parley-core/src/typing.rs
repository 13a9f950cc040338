//! Typing presence.
//!
//! Locally, every edit of the composer maps to a typing signal: non-empty
//! input means typing, empty input means not typing, and a sent message
//! always ends with "not typing". Remotely, the tracker keeps the set of
//! peers currently typing and shows the most recent one.
//!
//! There is no expiry. A peer whose "stopped typing" signal never arrives
//! stays visible until the context changes.

use parley_proto::OutboundAction;

/// Local and remote typing state for one session.
#[derive(Debug, Clone)]
pub struct TypingTracker {
    local_user: String,
    local_typing: bool,
    /// Peers currently typing, oldest signal first.
    typists: Vec<String>,
    shown: Option<String>,
}

impl TypingTracker {
    /// Create a tracker for `local_user`.
    pub fn new(local_user: impl Into<String>) -> Self {
        Self {
            local_user: local_user.into(),
            local_typing: false,
            typists: Vec::new(),
            shown: None,
        }
    }

    /// Username of the local user.
    pub fn local_user(&self) -> &str {
        &self.local_user
    }

    /// Whether the last signal sent said the local user is typing.
    #[must_use]
    pub fn is_local_typing(&self) -> bool {
        self.local_typing
    }

    /// Composer contents changed to `len` characters.
    ///
    /// Emitted on every change, not only on transitions.
    pub fn input_changed(&mut self, len: usize) -> OutboundAction {
        self.local_typing = len > 0;
        OutboundAction::typing(self.local_typing)
    }

    /// A message was sent; typing stops.
    pub fn message_sent(&mut self) -> OutboundAction {
        self.local_typing = false;
        OutboundAction::typing(false)
    }

    /// Apply a remote typing signal.
    ///
    /// Signals from the local user are ignored. Returns true when the
    /// visible indicator changed.
    pub fn observe(&mut self, sender: &str, is_typing: bool) -> bool {
        if sender == self.local_user {
            return false;
        }

        if is_typing {
            if !self.typists.iter().any(|name| name == sender) {
                self.typists.push(sender.to_string());
            }
        } else {
            self.typists.retain(|name| name != sender);
        }

        let next = self.typists.last().cloned();
        if next == self.shown {
            return false;
        }
        self.shown = next;
        true
    }

    /// Peer shown in the "is typing" indicator, if any.
    pub fn indicator(&self) -> Option<&str> {
        self.shown.as_deref()
    }

    /// Forget all remote typists. Used when the context changes.
    pub fn reset(&mut self) {
        self.typists.clear();
        self.shown = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_maps_to_typing_signal() {
        let mut tracker = TypingTracker::new("me");
        assert_eq!(tracker.input_changed(3), OutboundAction::typing(true));
        assert!(tracker.is_local_typing());
        assert_eq!(tracker.input_changed(4), OutboundAction::typing(true));
        assert_eq!(tracker.input_changed(0), OutboundAction::typing(false));
        assert!(!tracker.is_local_typing());
    }

    #[test]
    fn send_stops_typing() {
        let mut tracker = TypingTracker::new("me");
        tracker.input_changed(5);
        assert_eq!(tracker.message_sent(), OutboundAction::typing(false));
        assert!(!tracker.is_local_typing());
    }

    #[test]
    fn own_signal_is_ignored() {
        let mut tracker = TypingTracker::new("me");
        assert!(!tracker.observe("me", true));
        assert_eq!(tracker.indicator(), None);
    }

    #[test]
    fn indicator_follows_remote_typist() {
        let mut tracker = TypingTracker::new("me");
        assert!(tracker.observe("alice", true));
        assert_eq!(tracker.indicator(), Some("alice"));

        assert!(!tracker.observe("alice", true), "repeat signal is not a change");

        assert!(tracker.observe("alice", false));
        assert_eq!(tracker.indicator(), None);
    }

    #[test]
    fn most_recent_typist_is_shown() {
        let mut tracker = TypingTracker::new("me");
        tracker.observe("alice", true);
        assert!(tracker.observe("bob", true));
        assert_eq!(tracker.indicator(), Some("bob"));

        // Bob stops; Alice is still typing.
        assert!(tracker.observe("bob", false));
        assert_eq!(tracker.indicator(), Some("alice"));

        // Stop from someone not typing changes nothing.
        assert!(!tracker.observe("carol", false));
        assert_eq!(tracker.indicator(), Some("alice"));
    }

    #[test]
    fn reset_clears_indicator() {
        let mut tracker = TypingTracker::new("me");
        tracker.observe("alice", true);
        tracker.reset();
        assert_eq!(tracker.indicator(), None);
        assert!(tracker.observe("alice", true));
    }
}
