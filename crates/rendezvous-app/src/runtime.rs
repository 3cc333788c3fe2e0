//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: client state machine
//! - [`Driver`]: platform-specific I/O

use crate::{App, AppAction, Clock, Driver, ExitStatus, SystemClock};

/// Generic runtime that feeds driver events to the App and executes the
/// resulting actions.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `C`: Time source for message timestamps
pub struct Runtime<D, C = SystemClock>
where
    D: Driver,
    C: Clock,
{
    driver: D,
    app: App<C>,
}

impl<D, C> Runtime<D, C>
where
    D: Driver,
    C: Clock,
{
    /// Create a new runtime with the given driver and app.
    pub fn new(driver: D, app: App<C>) -> Self {
        Self { driver, app }
    }

    /// Run the main event loop until the app exits or the driver runs dry.
    ///
    /// Starts the connection, then handles one event at a time in arrival
    /// order. All actions produced for an event are executed before the next
    /// event is read.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(&mut self) -> Result<ExitStatus, D::Error> {
        let actions = self.app.connect();
        if let Some(status) = self.execute(actions)? {
            return Ok(status);
        }

        while let Some(event) = self.driver.next_event().await? {
            tracing::trace!(?event, "handling event");

            let actions = self.app.handle(event);
            if let Some(status) = self.execute(actions)? {
                tracing::debug!(?status, "exiting");
                return Ok(status);
            }
        }

        tracing::debug!("event sources closed");
        self.driver.disconnect();
        Ok(ExitStatus::Success)
    }

    /// Execute actions in order, stopping at the first exit.
    fn execute(&mut self, actions: Vec<AppAction>) -> Result<Option<ExitStatus>, D::Error> {
        for action in actions {
            match action {
                AppAction::Render(line) => self.driver.render(&line)?,
                AppAction::EraseInputLine => self.driver.erase_input_line()?,
                AppAction::ClearScreen => self.driver.clear_screen()?,
                AppAction::Connect { server_addr } => self.driver.connect(&server_addr)?,
                AppAction::Emit(intent) => self.driver.emit(intent)?,
                AppAction::Notify => self.driver.notify(),
                AppAction::Disconnect => self.driver.disconnect(),
                AppAction::Exit(status) => return Ok(Some(status)),
            }
        }
        Ok(None)
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App<C> {
        &self.app
    }

    /// Get a reference to the Driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Get a mutable reference to the Driver
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}
