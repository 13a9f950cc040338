//! Environment abstraction for deterministic testing.
//!
//! Decouples session logic from the system clock. Production uses
//! [`SystemEnv`]; the simulation harness supplies a virtual clock that only
//! moves when a test advances it.

use std::{
    fmt::Debug,
    ops::{Add, Sub},
    time::{Duration, Instant},
};

/// Point in time usable by the state machines.
///
/// Implemented for anything that behaves like [`std::time::Instant`]:
/// ordered, copyable, offsettable by a [`Duration`].
pub trait Timestamp:
    Copy + Ord + Debug + Send + Sync + Add<Duration, Output = Self> + Sub<Output = Duration>
{
}

impl<T> Timestamp for T where
    T: Copy + Ord + Debug + Send + Sync + Add<Duration, Output = T> + Sub<Output = Duration>
{
}

/// Source of time for a session.
///
/// # Invariants
///
/// - `now()` never goes backwards within a single execution context.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Instant type used by this environment.
    ///
    /// Production uses `std::time::Instant`; simulation uses virtual time.
    type Instant: Timestamp;

    /// Current time (monotonic).
    fn now(&self) -> Self::Instant;
}

/// Production environment backed by the system monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a system environment.
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }
}
