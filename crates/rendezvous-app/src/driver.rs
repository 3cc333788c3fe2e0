//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific I/O
//! implementations. The terminal frontend implements it over stdin, a
//! WebSocket transport and the system sound player; tests implement it over
//! a scripted queue of events.

use std::future::Future;

use rendezvous_proto::OutboundIntent;

use crate::{AppEvent, ConsoleLine};

/// Abstracts I/O operations for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic.
///
/// Only [`next_event`](Driver::next_event) may suspend. Every other method
/// completes immediately, so an event's actions are all executed before the
/// next event is read.
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Start connecting to `server_addr` and return without waiting for the
    /// handshake.
    ///
    /// The outcome is reported later through
    /// [`next_event`](Driver::next_event): either [`AppEvent::Connected`] or
    /// an inbound connect error. An address that cannot be used at all is
    /// reported the same way.
    ///
    /// # Errors
    ///
    /// Returns an error only if the driver itself is unusable.
    fn connect(&mut self, server_addr: &str) -> Result<(), Self::Error>;

    /// Wait for the next event from any source.
    ///
    /// Returns `None` once no source can produce another event.
    fn next_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Queue an intent for the server.
    ///
    /// Intents emitted before the handshake completes may be dropped by the
    /// transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver itself is unusable.
    fn emit(&mut self, intent: OutboundIntent) -> Result<(), Self::Error>;

    /// Write one line to the console.
    ///
    /// # Errors
    ///
    /// Returns an error if the console cannot be written.
    fn render(&mut self, line: &ConsoleLine) -> Result<(), Self::Error>;

    /// Overwrite the line echoed while the user typed.
    ///
    /// # Errors
    ///
    /// Returns an error if the console cannot be written.
    fn erase_input_line(&mut self) -> Result<(), Self::Error>;

    /// Clear the console.
    ///
    /// # Errors
    ///
    /// Returns an error if the console cannot be written.
    fn clear_screen(&mut self) -> Result<(), Self::Error>;

    /// Fire the audible notification. Failures are the driver's to swallow.
    fn notify(&mut self);

    /// Ask the transport to close.
    fn disconnect(&mut self);
}
