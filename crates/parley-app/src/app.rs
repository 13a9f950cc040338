//! Session state machine.
//!
//! This module defines the [`App`] state machine, the single source of truth
//! for which conversation is active. It owns the connection manager and the
//! typing tracker as fields, so a context switch, the connection it implies
//! and the view reset all happen in one `&mut self` call.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Tracks the active [`Context`] and the room membership cache.
//! - Re-scopes the live connection on every navigation.
//! - Gates the composer on room membership.
//! - Routes inbound frames to the view and typing tracker.

use parley_core::{
    ConnectionAction, ConnectionConfig, ConnectionManager, LinkStatus, Timestamp, TransportEvent,
    TypingTracker,
};
use parley_proto::{Context, Endpoint, HistoryEntry, InboundFrame, OutboundAction, RoomEntry};

use crate::{
    AppAction, AppError, AppEvent, ChatLine, DirectoryRequest, DirectoryResponse, SessionConfig,
    UiUpdate,
};

/// Header shown when no context is active.
const WELCOME_HEADER: &str = "Chat";

/// Status shown when a message is submitted to a room the user has not joined.
const NOT_A_MEMBER: &str = "Join the room to send messages";

/// Session state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App<I> {
    config: SessionConfig,
    /// Active context. Exactly one at any time.
    context: Context,
    connection: ConnectionManager<I>,
    typing: TypingTracker,
    /// Last room listing seen, with membership.
    rooms: Vec<RoomEntry>,
    /// Membership of the active room; `None` until the directory answers.
    membership: Option<bool>,
    /// Status shown last, to avoid repeating unchanged updates.
    link_status: LinkStatus,
}

impl<I: Timestamp> App<I> {
    /// Create a session for `config.local_user` against `endpoint`.
    pub fn new(endpoint: Endpoint, config: SessionConfig) -> Self {
        let connection = ConnectionManager::new(endpoint, ConnectionConfig {
            reconnect_delay: config.reconnect_delay,
        });
        let typing = TypingTracker::new(config.local_user.clone());
        Self {
            config,
            context: Context::None,
            connection,
            typing,
            rooms: Vec::new(),
            membership: None,
            link_status: LinkStatus::Offline,
        }
    }

    /// Initial view: welcome screen and directory listings.
    pub fn start(&mut self) -> Vec<AppAction> {
        let mut actions = self.welcome();
        actions.push(AppAction::Ui(UiUpdate::SetLinkStatus(self.link_status)));
        actions.push(AppAction::Directory(DirectoryRequest::Rooms));
        actions.push(AppAction::Directory(DirectoryRequest::Users));
        actions
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent, now: I) -> Vec<AppAction> {
        match event {
            AppEvent::Tick => {
                let opens = self.connection.tick(now);
                self.transport_actions(opens)
            },
            AppEvent::SelectRoom(name) => {
                self.select_room(&name).unwrap_or_else(|err| Self::rejected(&err))
            },
            AppEvent::SelectDirectMessage(peer) => {
                self.select_direct_message(&peer).unwrap_or_else(|err| Self::rejected(&err))
            },
            AppEvent::ClearSelection => self.clear_selection(),
            AppEvent::InputChanged(len) => self.input_changed(len),
            AppEvent::Submit(text) => self.submit(&text),
            AppEvent::JoinRoom(room) => {
                self.join_room(&room).unwrap_or_else(|err| Self::rejected(&err))
            },
            AppEvent::CreateRoom(name) => {
                self.create_room(&name).unwrap_or_else(|err| Self::rejected(&err))
            },
            AppEvent::RefreshDirectory => self.refresh_directory(),
            AppEvent::RoomInfo(room) => {
                self.room_info(&room).unwrap_or_else(|err| Self::rejected(&err))
            },
            AppEvent::Transport(event) => self.transport_event(event, now),
            AppEvent::Directory(response) => self.directory_response(response),
            AppEvent::Quit => {
                let closes = self.connection.shutdown();
                let mut actions = self.transport_actions(closes);
                actions.push(AppAction::Quit);
                actions
            },
        }
    }

    /// Switch to a room.
    ///
    /// The connection is re-scoped immediately; the composer stays disabled
    /// until the directory confirms membership.
    ///
    /// # Errors
    ///
    /// - `AppError::EmptyTarget` if `name` is empty or whitespace. The
    ///   session is unchanged.
    pub fn select_room(&mut self, name: &str) -> Result<Vec<AppAction>, AppError> {
        let context = Context::room(name)?;
        Ok(self.enter(context))
    }

    /// Switch to a direct message with `peer`.
    ///
    /// # Errors
    ///
    /// - `AppError::EmptyTarget` if `peer` is empty or whitespace. The
    ///   session is unchanged.
    pub fn select_direct_message(&mut self, peer: &str) -> Result<Vec<AppAction>, AppError> {
        let context = Context::direct_message(peer)?;
        Ok(self.enter(context))
    }

    /// Leave the current context and close the connection for good.
    pub fn clear_selection(&mut self) -> Vec<AppAction> {
        self.context = Context::None;
        self.membership = None;
        self.typing.reset();

        let mut actions = self.welcome();
        actions.push(AppAction::Ui(UiUpdate::SetTypingIndicator(None)));
        let closes = self.connection.shutdown();
        actions.extend(self.transport_actions(closes));
        actions
    }

    /// Composer contents changed.
    ///
    /// Nothing is signalled in a room the user has not joined.
    pub fn input_changed(&mut self, len: usize) -> Vec<AppAction> {
        if self.read_only() {
            return Vec::new();
        }
        let signal = self.typing.input_changed(len);
        self.connection.send(&signal).map(AppAction::Transport).into_iter().collect()
    }

    /// Send the composer contents.
    ///
    /// A blank message, or one typed while no connection is open, is dropped
    /// and the composer is left as is. In a room the user has not joined the
    /// message is refused with a status instead.
    pub fn submit(&mut self, text: &str) -> Vec<AppAction> {
        if self.read_only() {
            tracing::debug!(context = %self.context, "refusing send to unjoined room");
            return vec![AppAction::Ui(UiUpdate::SetStatus(NOT_A_MEMBER.to_string()))];
        }

        let Some(send) = self.connection.send(&OutboundAction::message(text)) else {
            tracing::debug!(open = self.connection.is_open(), "message not sent");
            return Vec::new();
        };

        let mut actions = vec![AppAction::Transport(send), AppAction::Ui(UiUpdate::ClearInput)];
        let stop = self.typing.message_sent();
        actions.extend(self.connection.send(&stop).map(AppAction::Transport));
        actions
    }

    /// Join a room, then switch to it.
    ///
    /// Joining a room the local user already belongs to skips the request and
    /// just switches.
    ///
    /// # Errors
    ///
    /// - `AppError::EmptyTarget` if `room` is empty or whitespace.
    pub fn join_room(&mut self, room: &str) -> Result<Vec<AppAction>, AppError> {
        let room = room.trim();
        if room.is_empty() {
            return Err(AppError::EmptyTarget("room"));
        }
        if self.is_member(room) {
            return self.select_room(room);
        }
        Ok(vec![AppAction::Directory(DirectoryRequest::Join { room: room.to_string() })])
    }

    /// Create a room, then switch to it.
    ///
    /// # Errors
    ///
    /// - `AppError::EmptyTarget` if `name` is empty or whitespace.
    pub fn create_room(&mut self, name: &str) -> Result<Vec<AppAction>, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::EmptyTarget("room"));
        }
        Ok(vec![
            AppAction::Ui(UiUpdate::SetStatus(format!("Creating room {name}..."))),
            AppAction::Directory(DirectoryRequest::Create { name: name.to_string() }),
        ])
    }

    /// Reload room and user listings.
    pub fn refresh_directory(&self) -> Vec<AppAction> {
        vec![
            AppAction::Directory(DirectoryRequest::Rooms),
            AppAction::Directory(DirectoryRequest::Users),
        ]
    }

    /// Fetch details for `room`.
    ///
    /// # Errors
    ///
    /// - `AppError::EmptyTarget` if `room` is empty or whitespace.
    pub fn room_info(&self, room: &str) -> Result<Vec<AppAction>, AppError> {
        let room = room.trim();
        if room.is_empty() {
            return Err(AppError::EmptyTarget("room"));
        }
        Ok(vec![AppAction::Directory(DirectoryRequest::RoomInfo { room: room.to_string() })])
    }

    /// Active context.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Connection manager.
    pub fn connection(&self) -> &ConnectionManager<I> {
        &self.connection
    }

    /// Typing tracker.
    pub fn typing(&self) -> &TypingTracker {
        &self.typing
    }

    /// Last room listing.
    pub fn rooms(&self) -> &[RoomEntry] {
        &self.rooms
    }

    /// Membership of the active room, if known.
    pub fn membership(&self) -> Option<bool> {
        self.membership
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// True while the active context is a room whose membership is not
    /// confirmed.
    pub fn read_only(&self) -> bool {
        self.context.as_room().is_some() && self.membership != Some(true)
    }

    /// Whether the room cache lists the local user as a member of `room`.
    pub fn is_member(&self, room: &str) -> bool {
        self.rooms.iter().any(|entry| entry.name == room && entry.is_member)
    }

    fn enter(&mut self, context: Context) -> Vec<AppAction> {
        let header = match &context {
            Context::Room(name) => format!("Room: {name}"),
            Context::DirectMessage(peer) => format!("DM with {peer}"),
            Context::None => WELCOME_HEADER.to_string(),
        };
        tracing::debug!(%context, "switching context");

        self.context = context.clone();
        self.membership = None;
        self.typing.reset();

        let mut actions = vec![
            AppAction::Ui(UiUpdate::SetHeaderText(header)),
            AppAction::Ui(UiUpdate::ClearMessages),
            AppAction::Ui(UiUpdate::SetTypingIndicator(None)),
            AppAction::Ui(UiUpdate::SetJoinBanner(None)),
        ];

        match &context {
            Context::Room(name) => {
                actions.push(AppAction::Ui(UiUpdate::SetInputEnabled(false)));
                actions.push(AppAction::Directory(DirectoryRequest::Membership {
                    room: name.clone(),
                }));
            },
            Context::DirectMessage(_) => {
                actions.push(AppAction::Ui(UiUpdate::SetInputEnabled(true)));
                actions.push(AppAction::Directory(DirectoryRequest::History {
                    context: context.clone(),
                }));
            },
            Context::None => {},
        }

        let transport = self.connection.reopen(&context);
        actions.extend(self.transport_actions(transport));
        actions
    }

    fn welcome(&self) -> Vec<AppAction> {
        vec![
            AppAction::Ui(UiUpdate::SetHeaderText(WELCOME_HEADER.to_string())),
            AppAction::Ui(UiUpdate::ClearMessages),
            AppAction::Ui(UiUpdate::SetInputEnabled(false)),
            AppAction::Ui(UiUpdate::SetJoinBanner(None)),
        ]
    }

    fn rejected(err: &AppError) -> Vec<AppAction> {
        tracing::debug!(%err, "rejected");
        vec![AppAction::Ui(UiUpdate::SetStatus(err.to_string()))]
    }

    /// Wrap connection actions and follow them with a status update if the
    /// link status moved.
    fn transport_actions(&mut self, transport: Vec<ConnectionAction>) -> Vec<AppAction> {
        let mut actions: Vec<AppAction> = transport.into_iter().map(AppAction::Transport).collect();
        actions.extend(self.status_update());
        actions
    }

    fn status_update(&mut self) -> Option<AppAction> {
        let status = self.connection.status();
        if status == self.link_status {
            return None;
        }
        self.link_status = status;
        Some(AppAction::Ui(UiUpdate::SetLinkStatus(status)))
    }

    fn transport_event(&mut self, event: TransportEvent, now: I) -> Vec<AppAction> {
        let frame = self.connection.handle_event(event, now);
        let mut actions: Vec<AppAction> = self.status_update().into_iter().collect();

        match frame {
            Some(InboundFrame::Message { sender, body, avatar }) => {
                let line = ChatLine::live(sender, body, avatar, &self.config.local_user);
                actions.push(AppAction::Ui(UiUpdate::RenderMessage(line)));
            },
            Some(InboundFrame::Typing { sender, is_typing }) => {
                if self.typing.observe(&sender, is_typing) {
                    let typist = self.typing.indicator().map(str::to_string);
                    actions.push(AppAction::Ui(UiUpdate::SetTypingIndicator(typist)));
                }
            },
            Some(InboundFrame::Presence { sender, online, .. }) => {
                if sender != self.config.local_user {
                    let presence = UiUpdate::ShowPresence { username: sender, online };
                    actions.push(AppAction::Ui(presence));
                }
            },
            None => {},
        }

        actions
    }

    fn directory_response(&mut self, response: DirectoryResponse) -> Vec<AppAction> {
        match response {
            DirectoryResponse::Rooms(rooms) => {
                self.rooms.clone_from(&rooms);
                vec![AppAction::Ui(UiUpdate::RenderRooms(rooms))]
            },
            DirectoryResponse::Users(users) => {
                let local = &self.config.local_user;
                let users: Vec<_> =
                    users.into_iter().filter(|user| user.username != *local).collect();
                vec![AppAction::Ui(UiUpdate::RenderUsers(users))]
            },
            DirectoryResponse::Membership { room, is_member } => {
                self.membership_answer(room, is_member)
            },
            DirectoryResponse::History { context, entries } => self.history(&context, entries),
            DirectoryResponse::Joined { room, ok } => {
                if !ok {
                    return vec![AppAction::Ui(UiUpdate::SetStatus(format!(
                        "Could not join {room}"
                    )))];
                }
                self.remember_member(&room);
                let mut actions = vec![AppAction::Directory(DirectoryRequest::Rooms)];
                actions.extend(self.select_room(&room).unwrap_or_else(|err| Self::rejected(&err)));
                actions
            },
            DirectoryResponse::Created { requested, outcome } => match outcome {
                Ok(room) => {
                    self.remember_member(&room);
                    let mut actions = vec![
                        AppAction::Ui(UiUpdate::SetStatus(format!("Created room {room}"))),
                        AppAction::Directory(DirectoryRequest::Rooms),
                    ];
                    actions
                        .extend(self.select_room(&room).unwrap_or_else(|err| Self::rejected(&err)));
                    actions
                },
                Err(reason) => vec![AppAction::Ui(UiUpdate::SetStatus(format!(
                    "Could not create {requested}: {reason}"
                )))],
            },
            DirectoryResponse::RoomInfo(info) => {
                vec![AppAction::Ui(UiUpdate::RenderRoomInfo(info))]
            },
        }
    }

    fn membership_answer(&mut self, room: String, is_member: bool) -> Vec<AppAction> {
        if self.context.as_room() != Some(room.as_str()) {
            tracing::debug!(%room, "ignoring membership answer for inactive room");
            return Vec::new();
        }

        self.membership = Some(is_member);
        if is_member {
            self.remember_member(&room);
            vec![
                AppAction::Ui(UiUpdate::SetJoinBanner(None)),
                AppAction::Ui(UiUpdate::SetInputEnabled(true)),
                AppAction::Directory(DirectoryRequest::History { context: self.context.clone() }),
            ]
        } else {
            vec![
                AppAction::Ui(UiUpdate::SetInputEnabled(false)),
                AppAction::Ui(UiUpdate::SetJoinBanner(Some(room))),
            ]
        }
    }

    fn history(&self, context: &Context, entries: Vec<HistoryEntry>) -> Vec<AppAction> {
        if *context != self.context {
            tracing::debug!(%context, "ignoring history for inactive context");
            return Vec::new();
        }

        let mut actions = vec![AppAction::Ui(UiUpdate::ClearMessages)];
        actions.extend(entries.into_iter().map(|entry| {
            AppAction::Ui(UiUpdate::RenderMessage(ChatLine::from_history(
                entry,
                &self.config.local_user,
            )))
        }));
        actions
    }

    fn remember_member(&mut self, room: &str) {
        match self.rooms.iter_mut().find(|entry| entry.name == room) {
            Some(entry) => entry.is_member = true,
            None => self.rooms.push(RoomEntry { name: room.to_string(), is_member: true }),
        }
    }
}
