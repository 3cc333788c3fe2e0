//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use rendezvous_proto::OutboundIntent;

use crate::ConsoleLine;

/// Actions produced by the App state machine.
///
/// Actions are executed in order. [`AppAction::Exit`] ends the run; any
/// actions after it are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Write one line to the console.
    Render(ConsoleLine),

    /// Overwrite the line the terminal echoed while the user typed.
    EraseInputLine,

    /// Clear the whole terminal.
    ClearScreen,

    /// Start connecting. Must not wait for the handshake.
    Connect {
        /// Server address as configured.
        server_addr: String,
    },

    /// Send an intent to the server.
    Emit(OutboundIntent),

    /// Fire the audible notification.
    Notify,

    /// Ask the transport to close.
    Disconnect,

    /// Stop processing and leave the process with this status.
    Exit(ExitStatus),
}

/// How the process ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// User quit or interrupted.
    Success,
    /// Could not connect to the server, or the terminal failed.
    Failure,
}

impl ExitStatus {
    /// Process exit code.
    pub fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
        }
    }
}
