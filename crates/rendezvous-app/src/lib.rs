//! Application layer for Rendezvous chat
//!
//! Pure state machine and generic runtime for a line-oriented chat client,
//! so the same orchestration runs against a real terminal and socket or a
//! scripted driver in tests.
//!
//! # Components
//!
//! - [`App`]: the client state machine. Owns the [`Session`] and covers the
//!   connection lifecycle, inbound event rendering, line input and slash
//!   commands.
//! - [`Driver`]: trait for platform-specific I/O (terminal, transport, sound)
//! - [`Runtime`]: orchestration loop feeding driver events into the [`App`]
//!   and executing the resulting [`AppAction`]s
//! - [`Clock`]: wall-clock seam for message timestamps

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod clock;
mod command;
mod driver;
mod event;
mod line;
mod runtime;
mod state;

pub use action::{AppAction, ExitStatus};
pub use app::{App, FAREWELL, USAGE_HINT, welcome_banner};
pub use clock::{Clock, FixedClock, SystemClock, TIME_FORMAT, UNKNOWN_TIME};
pub use command::{COMMAND_PREFIX, Command, CommandLine, HELP_LISTING};
pub use driver::Driver;
pub use event::AppEvent;
pub use line::{ConsoleLine, Tone};
pub use runtime::Runtime;
pub use state::{ConnectionState, Session, default_username};
