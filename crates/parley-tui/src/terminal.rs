//! Terminal driver for the client.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. Live connections are
//! tokio-tungstenite tasks from `parley-client`; directory requests run as
//! background tasks and answer through a channel.

use std::{
    collections::{HashMap, VecDeque},
    io::{self, Stdout, stdout},
    time::Duration,
};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use parley_app::{AppEvent, ChatLine, DirectoryRequest, DirectoryResponse, Driver, UiSink};
use parley_client::{HttpDirectory, SocketHandle, TransportError, spawn_connection};
use parley_core::{ConnectionId, LinkStatus, TransportEvent};
use parley_proto::{RoomEntry, RoomInfo, UserEntry};
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{Intent, KeyInput, ViewState, directory, ui};

/// Upper bound on how long a poll waits, and so on how late a reconnect
/// fires.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

const TRANSPORT_QUEUE: usize = 256;
const DIRECTORY_QUEUE: usize = 64;

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Transport could not be set up.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Owns the view state the session renders into, the open connection tasks
/// and the directory client.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    view: ViewState,
    /// Events produced by one key press beyond the first.
    queued: VecDeque<AppEvent>,
    cookie: Option<String>,
    connect_timeout: Duration,
    directory: HttpDirectory,
    sockets: HashMap<ConnectionId, SocketHandle>,
    transport_tx: mpsc::Sender<TransportEvent>,
    transport_rx: mpsc::Receiver<TransportEvent>,
    directory_tx: mpsc::Sender<DirectoryResponse>,
    directory_rx: mpsc::Receiver<DirectoryResponse>,
}

impl TerminalDriver {
    /// Take over the terminal and prepare clients for `server`.
    ///
    /// `cookie` authenticates both live connections and directory requests.
    pub fn new(
        server: &str,
        cookie: Option<String>,
        connect_timeout: Duration,
    ) -> Result<Self, TerminalError> {
        let directory = HttpDirectory::new(server, cookie.as_deref())?;

        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        let (transport_tx, transport_rx) = mpsc::channel(TRANSPORT_QUEUE);
        let (directory_tx, directory_rx) = mpsc::channel(DIRECTORY_QUEUE);

        Ok(Self {
            terminal,
            event_stream: EventStream::new(),
            view: ViewState::new(),
            queued: VecDeque::new(),
            cookie,
            connect_timeout,
            directory,
            sockets: HashMap::new(),
            transport_tx,
            transport_rx,
            directory_tx,
            directory_rx,
        })
    }

    /// Convert a crossterm key to [`KeyInput`].
    fn convert_key(code: KeyCode, modifiers: KeyModifiers) -> Option<KeyInput> {
        match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(KeyInput::Esc),
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            _ => None,
        }
    }

    fn handle_key(&mut self, key: KeyInput) {
        let enabled = self.view.input_enabled;
        for intent in self.view.composer.handle_key(key, enabled) {
            match intent {
                Intent::Event(event) => self.queued.push_back(event),
                Intent::Status(message) => self.view.set_status(message),
            }
        }
    }
}

impl UiSink for TerminalDriver {
    fn render_message(&mut self, line: ChatLine) {
        self.view.render_message(line);
    }

    fn clear_messages(&mut self) {
        self.view.clear_messages();
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.view.set_input_enabled(enabled);
    }

    fn set_typing_indicator(&mut self, typist: Option<String>) {
        self.view.set_typing_indicator(typist);
    }

    fn set_header_text(&mut self, text: String) {
        self.view.set_header_text(text);
    }

    fn clear_input(&mut self) {
        self.view.clear_input();
    }

    fn render_rooms(&mut self, rooms: Vec<RoomEntry>) {
        self.view.render_rooms(rooms);
    }

    fn render_users(&mut self, users: Vec<UserEntry>) {
        self.view.render_users(users);
    }

    fn render_room_info(&mut self, info: RoomInfo) {
        self.view.render_room_info(info);
    }

    fn show_presence(&mut self, username: String, online: bool) {
        self.view.show_presence(username, online);
    }

    fn set_link_status(&mut self, status: LinkStatus) {
        self.view.set_link_status(status);
    }

    fn set_status(&mut self, message: String) {
        self.view.set_status(message);
    }

    fn set_join_banner(&mut self, room: Option<String>) {
        self.view.set_join_banner(room);
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        if let Some(event) = self.queued.pop_front() {
            return Ok(Some(event));
        }

        tokio::select! {
            biased;

            // Terminal events
            maybe_event = self.event_stream.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if let Some(input) = Self::convert_key(key.code, key.modifiers) {
                        self.handle_key(input);
                    }
                },
                Some(Ok(_)) => {},
                Some(Err(e)) => return Err(TerminalError::Io(e)),
                None => return Ok(Some(AppEvent::Quit)),
            },

            // Connection tasks
            Some(event) = self.transport_rx.recv() => {
                if let TransportEvent::Closed { id } = event {
                    self.sockets.remove(&id);
                }
                return Ok(Some(AppEvent::Transport(event)));
            },

            // Directory answers
            Some(response) = self.directory_rx.recv() => {
                return Ok(Some(AppEvent::Directory(response)));
            },

            // Tick timeout
            () = tokio::time::sleep(POLL_INTERVAL) => {},
        }

        Ok(self.queued.pop_front())
    }

    fn open(&mut self, id: ConnectionId, endpoint: &str) {
        tracing::debug!(id, endpoint, "spawning connection");
        let handle = spawn_connection(
            id,
            endpoint.to_string(),
            self.cookie.clone(),
            self.connect_timeout,
            self.transport_tx.clone(),
        );
        if let Some(previous) = self.sockets.insert(id, handle) {
            previous.stop();
        }
    }

    fn close(&mut self, id: ConnectionId) {
        if let Some(handle) = self.sockets.remove(&id) {
            handle.close();
        }
    }

    fn send_text(&mut self, id: ConnectionId, text: String) {
        let Some(handle) = self.sockets.get(&id) else {
            tracing::warn!(id, "send on unknown connection");
            return;
        };
        if let Err(error) = handle.send(text) {
            tracing::warn!(id, %error, "send failed");
        }
    }

    fn request(&mut self, request: DirectoryRequest) {
        tracing::debug!(?request, "directory request");
        let directory = self.directory.clone();
        let answers = self.directory_tx.clone();
        tokio::spawn(async move {
            let response = directory::answer(&directory, request).await;
            let _ = answers.send(response).await;
        });
    }

    fn render(&mut self) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| ui::render(frame, &self.view))?;
        Ok(())
    }

    fn stop(&mut self) {
        for (_, handle) in self.sockets.drain() {
            handle.stop();
        }
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.stop();
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}
