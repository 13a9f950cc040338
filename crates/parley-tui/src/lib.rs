//! Terminal client for Parley.
//!
//! A thin shell over [`parley_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`parley_app::Runtime`].
//!
//! This crate handles terminal rendering, line editing and slash commands,
//! and hands network work to `parley-client`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod commands;
pub mod config;
pub mod directory;
pub mod input;
pub mod terminal;
pub mod ui;
pub mod view;

pub use config::Args;
pub use input::{InputState, Intent, KeyInput};
pub use parley_app::{App, AppEvent, Driver, Runtime};
pub use terminal::{TerminalDriver, TerminalError};
pub use view::{LogLine, ViewState};
