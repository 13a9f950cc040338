//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: session state machine
//! - [`Driver`]: platform-specific I/O
//! - [`Environment`]: clock

use parley_core::{ConnectionAction, Environment};

use crate::{App, AppAction, AppEvent, Driver, SessionConfig};

/// Generic runtime that orchestrates App and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `E`: Environment providing time
pub struct Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    driver: D,
    env: E,
    app: App<E::Instant>,
}

impl<D, E> Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    /// Create a new runtime around an existing session.
    pub fn new(driver: D, env: E, app: App<E::Instant>) -> Self {
        Self { driver, env, app }
    }

    /// Create a runtime with a fresh session.
    pub fn with_config(
        driver: D,
        env: E,
        endpoint: parley_proto::Endpoint,
        config: SessionConfig,
    ) -> Self {
        Self::new(driver, env, App::new(endpoint, config))
    }

    /// Session state.
    pub fn app(&self) -> &App<E::Instant> {
        &self.app
    }

    /// Driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Consume the runtime, returning the driver.
    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Mutable driver access, for injecting input between steps.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Run the main event loop until the session quits.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(&mut self) -> Result<(), D::Error> {
        self.start()?;

        loop {
            if self.step().await? {
                break;
            }
        }

        self.driver.stop();
        Ok(())
    }

    /// Show the initial view and request directory listings.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn start(&mut self) -> Result<(), D::Error> {
        let actions = self.app.start();
        self.execute(actions);
        self.driver.render()
    }

    /// Process one cycle of the event loop.
    ///
    /// Each cycle:
    /// 1. Polls the driver for the next event
    /// 2. Feeds it to the session, then ticks the session
    /// 3. Executes the resulting actions through the driver
    /// 4. Renders
    ///
    /// Returns `true` if the application should quit.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn step(&mut self) -> Result<bool, D::Error> {
        let event = self.driver.poll_event().await?;
        let now = self.env.now();

        let mut actions = match event {
            Some(event) => self.app.handle(event, now),
            None => Vec::new(),
        };
        actions.extend(self.app.handle(AppEvent::Tick, now));

        let quit = self.execute(actions);
        self.driver.render()?;
        Ok(quit)
    }

    /// Execute actions through the driver.
    ///
    /// Returns `true` if one of them asked to quit.
    fn execute(&mut self, actions: Vec<AppAction>) -> bool {
        let mut quit = false;
        for action in actions {
            match action {
                AppAction::Ui(update) => self.driver.apply(update),
                AppAction::Transport(ConnectionAction::Open { id, endpoint, .. }) => {
                    self.driver.open(id, &endpoint);
                },
                AppAction::Transport(ConnectionAction::Close { id }) => self.driver.close(id),
                AppAction::Transport(ConnectionAction::Send { id, text }) => {
                    self.driver.send_text(id, text);
                },
                AppAction::Directory(request) => self.driver.request(request),
                AppAction::Quit => quit = true,
            }
        }
        quit
    }
}
