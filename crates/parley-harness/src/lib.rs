//! Deterministic simulation harness for the Parley client.
//!
//! Virtual-time [`SimEnv`] and a scripted [`SimDriver`] let the production
//! [`parley_app::Runtime`] run without a network or a terminal. Time only
//! moves when the script says so, so reconnect timing is exact and every run
//! is reproducible.
//!
//! # Invariant Testing
//!
//! The `invariants` module checks behavioral properties against a
//! [`SessionSnapshot`] taken from the session and the driver after every
//! step. Use [`InvariantRegistry::standard()`] for the connection lifecycle
//! guarantees.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod directory;
pub mod invariants;
pub mod sim_driver;
pub mod sim_env;

pub use directory::SimDirectory;
pub use invariants::{
    IdleWithoutContext, Invariant, InvariantRegistry, InvariantResult, LiveConnectionIsOwned,
    NoSelfTypingIndicator, ScopeMatchesContext, SessionSnapshot, SingleLiveConnection, Violation,
};
pub use sim_driver::{Recording, SimDriver, SimDriverError, SimView, Step};
pub use sim_env::{SimEnv, SimInstant};
