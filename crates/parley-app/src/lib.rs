//! Application layer for Parley
//!
//! The session state machine and a generic runtime, so the same orchestration
//! code runs in the terminal client and in deterministic simulation.
//!
//! # Components
//!
//! - [`App`]: session state machine (active context, connection lifecycle,
//!   typing presence, directory answers)
//! - [`UiSink`]: opaque render operations implemented by each front end
//! - [`Driver`]: trait for platform-specific I/O
//! - [`Runtime`]: generic orchestration loop using a Driver and an Environment

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod driver;
mod error;
mod event;
mod runtime;
mod sink;
mod state;

pub use action::{AppAction, DirectoryRequest};
pub use app::App;
pub use driver::Driver;
pub use error::AppError;
pub use event::{AppEvent, DirectoryResponse};
pub use runtime::Runtime;
pub use sink::{UiSink, UiUpdate};
pub use state::{ChatLine, SessionConfig};
