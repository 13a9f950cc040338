//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as `TerminalDriver` but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`parley_app::Runtime`] orchestration code runs in both production and
//! simulation.
//!
//! Input comes from a script of [`Step`]s. Events the driver generates itself
//! (connection confirmations, directory answers, injected frames) are queued
//! ahead of the script, the way real network completions interleave with
//! user input.

use std::{collections::VecDeque, time::Duration};

use parley_app::{AppEvent, ChatLine, DirectoryRequest, Driver, UiSink, UiUpdate};
use parley_core::{ConnectionId, LinkStatus, TransportEvent};
use parley_proto::{RoomEntry, RoomInfo, UserEntry};

use crate::{SimDirectory, SimEnv};

/// Error type for simulation driver.
#[derive(Debug, Clone)]
pub struct SimDriverError(pub String);

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Deliver an event.
    Event(AppEvent),
    /// Move virtual time forward; the poll returns nothing.
    Advance(Duration),
}

/// What the driver was asked to do.
#[derive(Debug, Clone, Default)]
pub struct Recording {
    /// Connections opened, with their endpoints.
    pub opened: Vec<(ConnectionId, String)>,
    /// Connections closed by the session.
    pub closed: Vec<ConnectionId>,
    /// Text frames written.
    pub sent: Vec<(ConnectionId, String)>,
    /// Writes aimed at a connection that was not live.
    pub stray_sends: usize,
    /// Directory requests.
    pub requests: Vec<DirectoryRequest>,
    /// Every view update, in order.
    pub updates: Vec<UiUpdate>,
    /// Connections currently live from the transport's point of view.
    pub live: Vec<ConnectionId>,
}

/// What a user would see.
#[derive(Debug, Clone, Default)]
pub struct SimView {
    /// Header line.
    pub header: String,
    /// Message log.
    pub messages: Vec<ChatLine>,
    /// Composer enabled.
    pub input_enabled: bool,
    /// Typing indicator.
    pub typing: Option<String>,
    /// Join banner.
    pub join_banner: Option<String>,
    /// Times the composer was cleared.
    pub input_cleared: usize,
    /// Room list.
    pub rooms: Vec<RoomEntry>,
    /// User list.
    pub users: Vec<UserEntry>,
    /// Last room details shown.
    pub room_info: Option<RoomInfo>,
    /// Presence changes shown.
    pub presence: Vec<(String, bool)>,
    /// Connection status.
    pub link_status: Option<LinkStatus>,
    /// Last status message.
    pub status: Option<String>,
}

/// Simulation driver for deterministic testing.
///
/// Implements [`Driver`] trait so the same [`parley_app::Runtime`]
/// orchestration code runs in both the terminal client and simulation tests.
pub struct SimDriver {
    env: SimEnv,
    script: VecDeque<Step>,
    pending: VecDeque<AppEvent>,
    directory: Option<SimDirectory>,
    auto_open: bool,
    recording: Recording,
    view: SimView,
    renders: usize,
    stopped: bool,
}

impl SimDriver {
    /// Create a driver sharing `env`'s clock.
    ///
    /// Connections open as soon as they are requested; directory requests
    /// are recorded but not answered.
    pub fn new(env: SimEnv) -> Self {
        Self {
            env,
            script: VecDeque::new(),
            pending: VecDeque::new(),
            directory: None,
            auto_open: true,
            recording: Recording::default(),
            view: SimView::default(),
            renders: 0,
            stopped: false,
        }
    }

    /// Answer directory requests from `directory`.
    #[must_use]
    pub fn with_directory(mut self, directory: SimDirectory) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Leave connections pending until [`Self::accept`] is called.
    #[must_use]
    pub fn manual_open(mut self) -> Self {
        self.auto_open = false;
        self
    }

    /// Append a scripted event.
    pub fn script_event(&mut self, event: AppEvent) {
        self.script.push_back(Step::Event(event));
    }

    /// Append a scripted clock advance.
    pub fn script_advance(&mut self, by: Duration) {
        self.script.push_back(Step::Advance(by));
    }

    /// Append several steps.
    pub fn script(&mut self, steps: impl IntoIterator<Item = Step>) {
        self.script.extend(steps);
    }

    /// Confirm that connection `id` opened.
    pub fn accept(&mut self, id: ConnectionId) {
        self.pending.push_back(AppEvent::Transport(TransportEvent::Opened { id }));
    }

    /// Deliver a raw text frame on connection `id`.
    pub fn deliver(&mut self, id: ConnectionId, text: impl Into<String>) {
        self.pending.push_back(AppEvent::Transport(TransportEvent::Text { id, text: text.into() }));
    }

    /// Drop connection `id` from the network side.
    pub fn drop_connection(&mut self, id: ConnectionId) {
        self.recording.live.retain(|live| *live != id);
        self.pending.push_back(AppEvent::Transport(TransportEvent::Failed {
            id,
            reason: "connection reset".to_string(),
        }));
        self.pending.push_back(AppEvent::Transport(TransportEvent::Closed { id }));
    }

    /// Queue an event ahead of the script.
    pub fn inject_event(&mut self, event: AppEvent) {
        self.pending.push_back(event);
    }

    /// True if script or injected events remain.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty() || !self.script.is_empty()
    }

    /// Most recently opened connection.
    pub fn last_opened(&self) -> Option<ConnectionId> {
        self.recording.opened.last().map(|(id, _)| *id)
    }

    /// Recorded driver calls.
    pub fn recording(&self) -> &Recording {
        &self.recording
    }

    /// Current view.
    pub fn view(&self) -> &SimView {
        &self.view
    }

    /// Directory state, if the driver answers requests.
    pub fn directory(&self) -> Option<&SimDirectory> {
        self.directory.as_ref()
    }

    /// Number of render calls.
    pub fn renders(&self) -> usize {
        self.renders
    }

    /// True once the runtime stopped the driver.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Clock shared with the runtime.
    pub fn env(&self) -> &SimEnv {
        &self.env
    }

    fn next_event(&mut self) -> Option<AppEvent> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }

        match self.script.pop_front() {
            Some(Step::Event(event)) => Some(event),
            Some(Step::Advance(by)) => {
                self.env.advance(by);
                None
            },
            None => Some(AppEvent::Quit),
        }
    }
}

impl UiSink for SimDriver {
    fn render_message(&mut self, line: ChatLine) {
        self.view.messages.push(line.clone());
        self.recording.updates.push(UiUpdate::RenderMessage(line));
    }

    fn clear_messages(&mut self) {
        self.view.messages.clear();
        self.recording.updates.push(UiUpdate::ClearMessages);
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.view.input_enabled = enabled;
        self.recording.updates.push(UiUpdate::SetInputEnabled(enabled));
    }

    fn set_typing_indicator(&mut self, typist: Option<String>) {
        self.view.typing.clone_from(&typist);
        self.recording.updates.push(UiUpdate::SetTypingIndicator(typist));
    }

    fn set_header_text(&mut self, text: String) {
        self.view.header.clone_from(&text);
        self.recording.updates.push(UiUpdate::SetHeaderText(text));
    }

    fn clear_input(&mut self) {
        self.view.input_cleared += 1;
        self.recording.updates.push(UiUpdate::ClearInput);
    }

    fn render_rooms(&mut self, rooms: Vec<RoomEntry>) {
        self.view.rooms.clone_from(&rooms);
        self.recording.updates.push(UiUpdate::RenderRooms(rooms));
    }

    fn render_users(&mut self, users: Vec<UserEntry>) {
        self.view.users.clone_from(&users);
        self.recording.updates.push(UiUpdate::RenderUsers(users));
    }

    fn render_room_info(&mut self, info: RoomInfo) {
        self.view.room_info = Some(info.clone());
        self.recording.updates.push(UiUpdate::RenderRoomInfo(info));
    }

    fn show_presence(&mut self, username: String, online: bool) {
        self.view.presence.push((username.clone(), online));
        self.recording.updates.push(UiUpdate::ShowPresence { username, online });
    }

    fn set_link_status(&mut self, status: LinkStatus) {
        self.view.link_status = Some(status);
        self.recording.updates.push(UiUpdate::SetLinkStatus(status));
    }

    fn set_status(&mut self, message: String) {
        self.view.status = Some(message.clone());
        self.recording.updates.push(UiUpdate::SetStatus(message));
    }

    fn set_join_banner(&mut self, room: Option<String>) {
        self.view.join_banner.clone_from(&room);
        self.recording.updates.push(UiUpdate::SetJoinBanner(room));
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        if self.stopped {
            return Err(SimDriverError("driver stopped".to_string()));
        }
        Ok(self.next_event())
    }

    fn open(&mut self, id: ConnectionId, endpoint: &str) {
        tracing::trace!(id, endpoint, "sim open");
        self.recording.opened.push((id, endpoint.to_string()));
        self.recording.live.push(id);
        if self.auto_open {
            self.accept(id);
        }
    }

    fn close(&mut self, id: ConnectionId) {
        self.recording.closed.push(id);
        self.recording.live.retain(|live| *live != id);
    }

    fn send_text(&mut self, id: ConnectionId, text: String) {
        if !self.recording.live.contains(&id) {
            self.recording.stray_sends += 1;
        }
        self.recording.sent.push((id, text));
    }

    fn request(&mut self, request: DirectoryRequest) {
        if let Some(directory) = self.directory.as_mut() {
            let response = directory.answer(&request);
            self.pending.push_back(AppEvent::Directory(response));
        }
        self.recording.requests.push(request);
    }

    fn render(&mut self) -> Result<(), Self::Error> {
        self.renders += 1;
        Ok(())
    }

    fn stop(&mut self) {
        self.recording.live.clear();
        self.stopped = true;
    }
}
