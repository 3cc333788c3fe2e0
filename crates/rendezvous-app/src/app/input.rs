//! Line input interpretation.

use rendezvous_proto::OutboundIntent;

use super::{App, render};
use crate::{AppAction, COMMAND_PREFIX, Clock, CommandLine, Tone};

impl<C: Clock> App<C> {
    /// Handle one completed input line.
    ///
    /// Blank lines produce nothing. Anything else first erases the terminal's
    /// echo of the line, then runs as a command or goes out as a chat message.
    pub(super) fn handle_line(&mut self, raw: &str) -> Vec<AppAction> {
        let text = raw.trim();
        if text.is_empty() {
            return vec![];
        }

        let mut actions = vec![AppAction::EraseInputLine];

        if text.starts_with(COMMAND_PREFIX) {
            actions.extend(self.run_command(CommandLine::parse(text)));
        } else if self.session.is_connected() {
            let time = self.clock.time_of_day(self.clock.now());
            actions.push(AppAction::Emit(OutboundIntent::ChatMessage { text: text.to_owned() }));
            actions.push(render(Tone::Outgoing, format!("[{time}] You: {text}")));
        } else {
            tracing::debug!("dropping chat line while {:?}", self.session.connection());
            actions.push(render(Tone::Error, "Not connected to server"));
        }

        actions
    }
}
