//! Slash command execution.

use rendezvous_proto::OutboundIntent;

use super::{App, render};
use crate::{AppAction, Clock, Command, CommandLine, Tone};

impl<C: Clock> App<C> {
    /// Run a parsed command. Never fails: unknown commands report and show
    /// help.
    pub(super) fn run_command(&mut self, line: CommandLine) -> Vec<AppAction> {
        if !line.args.is_empty() {
            tracing::trace!(args = ?line.args, "ignoring command arguments");
        }

        match line.command {
            Command::Help => self.help(),
            Command::Quit => self.shutdown(),
            // The reply arrives later as a `users_list` event.
            Command::Users => vec![AppAction::Emit(OutboundIntent::RequestUsersList)],
            Command::Clear => vec![AppAction::ClearScreen],
            Command::Unknown { token } => {
                let mut actions = vec![render(Tone::Error, format!("Unknown command: {token}"))];
                actions.extend(self.help());
                actions
            },
        }
    }
}
