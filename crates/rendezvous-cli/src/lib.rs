//! Terminal chat client for Rendezvous
//!
//! A thin shell over [`rendezvous_app::Driver`] that provides terminal and
//! network I/O. All orchestration logic lives in the generic
//! [`rendezvous_app::Runtime`].
//!
//! This crate only handles console output, line input, the interrupt signal
//! and the notification sound.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod console;
pub mod notify;
pub mod terminal;

pub use console::Console;
pub use notify::Notifier;
pub use rendezvous_app::{App, AppAction, AppEvent, Driver, Runtime};
pub use terminal::{TerminalDriver, TerminalError};
