//! Parley protocol types.
//!
//! Everything that crosses a process boundary lives here: the [`Context`] a
//! live connection is scoped to, the [`Endpoint`] addressing scheme for those
//! connections, the JSON frames exchanged over them ([`InboundFrame`],
//! [`OutboundAction`]), and the directory/history payloads served over HTTP.
//!
//! The crate is pure data and codecs and performs no I/O. Decoding returns a
//! [`ProtocolError`]; [`InboundFrame::parse`] is the lenient entry point that
//! logs and drops malformed frames instead.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod context;
pub mod endpoint;
pub mod errors;
pub mod frame;
pub mod payloads;

pub use context::{Context, ContextKind};
pub use endpoint::Endpoint;
pub use errors::{ProtocolError, Result};
pub use frame::{InboundFrame, OutboundAction};
pub use payloads::{
    CreateRoomReply, CreateRoomRequest, HistoryEntry, JoinRoomReply, RoomEntry, RoomInfo,
    UserEntry,
};
