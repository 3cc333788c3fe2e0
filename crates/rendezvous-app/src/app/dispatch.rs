//! Inbound event rendering.
//!
//! One exhaustive match over [`InboundEvent`]. Every arm runs to completion
//! and only produces console output, except `ChatMessage` (which may also
//! notify) and `ConnectError` (which exits).

use rendezvous_proto::{InboundEvent, Timestamp, UserEntry};

use super::{App, render};
use crate::{AppAction, Clock, Tone, UNKNOWN_TIME};

impl<C: Clock> App<C> {
    pub(super) fn dispatch(&mut self, event: InboundEvent) -> Vec<AppAction> {
        match event {
            InboundEvent::SystemMessage { text } => vec![render(Tone::Announcement, text)],
            InboundEvent::ChatMessage { username, text, timestamp } => {
                // Our own messages were rendered when sent.
                if username == self.session.username() {
                    tracing::trace!("suppressing echo of own message");
                    return vec![];
                }

                let time = self.label(timestamp.as_ref());
                vec![render(Tone::Incoming, format!("[{time}] {username}: {text}")), AppAction::Notify]
            },
            InboundEvent::UserJoined { text } => vec![render(Tone::Joined, text)],
            InboundEvent::UserLeft { text } => vec![render(Tone::Left, text)],
            InboundEvent::UsersList { entries } => vec![render(Tone::Roster, roster(&entries))],
            InboundEvent::TypingNotice { username, is_typing } => {
                if is_typing {
                    vec![render(Tone::Typing, format!("{username} is typing..."))]
                } else {
                    vec![]
                }
            },
            InboundEvent::ConnectError { reason } => self.connect_failed(&reason),
        }
    }

    fn label(&self, timestamp: Option<&Timestamp>) -> String {
        timestamp
            .and_then(Timestamp::to_utc)
            .map_or_else(|| UNKNOWN_TIME.to_owned(), |instant| self.clock.time_of_day(instant))
    }
}

fn roster(entries: &[UserEntry]) -> String {
    let names: Vec<&str> = entries.iter().map(|entry| entry.username.as_str()).collect();
    format!("Currently online: {}", names.join(", "))
}
