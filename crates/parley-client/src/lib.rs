//! Network side of the Parley client.
//!
//! Thin I/O layers with no session logic: [`spawn_connection`] runs one
//! WebSocket connection and reports what happens to it as
//! [`parley_core::TransportEvent`]s, and [`HttpDirectory`] talks to the
//! directory and history endpoints. Deciding when to open, close or reconnect
//! stays in the sans-IO core.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod directory;
mod error;
mod transport;

pub use directory::HttpDirectory;
pub use error::TransportError;
pub use transport::{CONNECT_TIMEOUT, SocketHandle, spawn_connection};
