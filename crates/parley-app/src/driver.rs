//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::future::Future;

use parley_core::ConnectionId;

use crate::{AppEvent, DirectoryRequest, UiSink};

/// Abstracts I/O operations for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic. This ensures
/// the same orchestration code runs in the terminal client and simulation.
///
/// Network work is asynchronous: `open`, `send_text` and `request` only start
/// it, and outcomes come back through [`Driver::poll_event`] as
/// [`AppEvent::Transport`] or [`AppEvent::Directory`]. Every transport event
/// must carry the [`ConnectionId`] the connection was opened with.
///
/// # Implementations
///
/// - **TUI**: crossterm for terminal events, tokio-tungstenite and reqwest
///   for the network
/// - **Simulation**: scripted events and a recording sink
pub trait Driver: UiSink + Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next event.
    ///
    /// Returns `None` when nothing arrived within the driver's poll interval;
    /// the runtime ticks the session on every return, so the interval bounds
    /// how late a reconnect can fire.
    ///
    /// # Errors
    ///
    /// Returns an error if the input source fails.
    fn poll_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Start opening connection `id` to `endpoint`.
    fn open(&mut self, id: ConnectionId, endpoint: &str);

    /// Close connection `id`.
    ///
    /// Events the transport still reports for it are ignored by the session.
    fn close(&mut self, id: ConnectionId);

    /// Write a text frame on connection `id`.
    fn send_text(&mut self, id: ConnectionId, text: String);

    /// Start a directory request.
    fn request(&mut self, request: DirectoryRequest);

    /// Flush pending view updates.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self) -> Result<(), Self::Error>;

    /// Close all connections and clean up resources.
    fn stop(&mut self);
}
