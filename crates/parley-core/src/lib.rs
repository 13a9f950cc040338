//! Parley core
//!
//! Pure state machines for the client side of a Parley session. Nothing here
//! performs I/O: methods take the current time as a parameter and return
//! actions for a driver to execute, which keeps every transition testable
//! with virtual time.
//!
//! # Components
//!
//! - [`ConnectionManager`]: owns the single live connection, replaces it on
//!   navigation and reconnects it after unexpected loss
//! - [`TypingTracker`]: local typing signal and the remote "is typing"
//!   indicator
//! - [`Environment`]: clock abstraction shared by production and simulation

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod connection;
pub mod env;
pub mod typing;

pub use connection::{
    ConnectionAction, ConnectionConfig, ConnectionId, ConnectionManager, DEFAULT_RECONNECT_DELAY,
    Link, LinkState, LinkStatus, TransportEvent,
};
pub use env::{Environment, SystemEnv, Timestamp};
pub use typing::TypingTracker;
