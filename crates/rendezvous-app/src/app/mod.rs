//! Application state machine.
//!
//! This module defines the [`App`] state machine, which owns the [`Session`]
//! and turns every [`AppEvent`] into a list of [`AppAction`]s, completely
//! decoupled from terminal and network I/O.
//!
//! # Responsibilities
//!
//! - Connection lifecycle: connect, handshake, disconnect, connect failure
//!   (this module).
//! - Rendering inbound server events ([`dispatch`]).
//! - Interpreting completed input lines ([`input`]) and slash commands
//!   ([`commands`]).
//!
//! Handlers never call each other across those boundaries; the only state
//! they share is the session's username and connection state.

mod commands;
mod dispatch;
mod input;

use rendezvous_proto::OutboundIntent;

use crate::{
    AppAction, AppEvent, Clock, ConnectionState, ConsoleLine, ExitStatus, HELP_LISTING, Session,
    SystemClock, Tone,
};

/// Said on the way out.
pub const FAREWELL: &str = "Goodbye!";

/// Shown once after connecting, below the help listing.
pub const USAGE_HINT: &str = "Just type a message and press Enter to chat! Press Ctrl+C to exit.";

/// Lines shown at startup, before the username prompt.
pub fn welcome_banner() -> Vec<ConsoleLine> {
    vec![
        ConsoleLine::new(Tone::Banner, "Welcome to Rendezvous Chat!"),
        ConsoleLine::new(Tone::Muted, "Connecting to server..."),
    ]
}

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable with a fixed clock.
#[derive(Debug, Clone)]
pub struct App<C = SystemClock> {
    /// Local user and connection state.
    session: Session,
    /// Server address for connection.
    server_addr: String,
    /// Time source for message timestamps.
    clock: C,
}

impl<C: Clock> App<C> {
    /// Create an App for `session` that will connect to `server_addr`.
    pub fn new(session: Session, server_addr: impl Into<String>, clock: C) -> Self {
        Self { session, server_addr: server_addr.into(), clock }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Connected => self.on_connected(),
            AppEvent::Disconnected => self.on_disconnected(),
            AppEvent::Inbound(event) => self.dispatch(event),
            AppEvent::Line(line) => self.handle_line(&line),
            AppEvent::Interrupt => self.shutdown(),
        }
    }

    /// Initiate connection to the server.
    ///
    /// The returned [`AppAction::Connect`] starts the transport without
    /// waiting; the outcome arrives later as [`AppEvent::Connected`] or an
    /// inbound connect error.
    pub fn connect(&mut self) -> Vec<AppAction> {
        self.session.set_connection(ConnectionState::Connecting);
        vec![AppAction::Connect { server_addr: self.server_addr.clone() }]
    }

    fn on_connected(&mut self) -> Vec<AppAction> {
        self.session.set_connection(ConnectionState::Connected);

        let mut actions = vec![
            render(Tone::Connected, "Connected to server!"),
            AppAction::Emit(OutboundIntent::Join { username: self.session.username().to_owned() }),
        ];
        actions.extend(self.help());
        actions.push(render(Tone::Muted, USAGE_HINT));
        actions
    }

    fn on_disconnected(&mut self) -> Vec<AppAction> {
        self.session.set_connection(ConnectionState::Disconnected);
        vec![render(Tone::Disconnected, "Disconnected from server")]
    }

    /// Fatal: report and exit with [`ExitStatus::Failure`].
    fn connect_failed(&mut self, reason: &str) -> Vec<AppAction> {
        tracing::warn!(server = %self.server_addr, reason, "connection failed");
        self.session.set_connection(ConnectionState::Failed);

        let reason = reason.trim();
        let text = if reason.is_empty() {
            format!("Connection failed. Make sure the server is running at {}", self.server_addr)
        } else {
            format!(
                "Connection failed ({reason}). Make sure the server is running at {}",
                self.server_addr
            )
        };

        vec![render(Tone::Error, text), AppAction::Exit(ExitStatus::Failure)]
    }

    /// Graceful exit for `/quit` and Ctrl+C.
    fn shutdown(&self) -> Vec<AppAction> {
        vec![render(Tone::Farewell, FAREWELL), AppAction::Disconnect, AppAction::Exit(ExitStatus::Success)]
    }

    fn help(&self) -> Vec<AppAction> {
        HELP_LISTING
            .iter()
            .enumerate()
            .map(|(i, line)| render(if i == 0 { Tone::Heading } else { Tone::Help }, *line))
            .collect()
    }

    /// The local session.
    pub fn session(&self) -> &Session {
        &self.session
    }
}

fn render(tone: Tone, text: impl Into<String>) -> AppAction {
    AppAction::Render(ConsoleLine::new(tone, text))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rand::{SeedableRng, rngs::StdRng};
    use rendezvous_proto::InboundEvent;

    use super::*;
    use crate::FixedClock;

    fn app(name: &str) -> App<FixedClock> {
        let mut rng = StdRng::seed_from_u64(1);
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).single().expect("valid date");
        App::new(Session::new(name, &mut rng), "http://localhost:3000", FixedClock::utc(now))
    }

    #[test]
    fn connect_moves_to_connecting_without_emitting() {
        let mut app = app("Ann");
        let actions = app.connect();

        assert_eq!(
            actions,
            vec![AppAction::Connect { server_addr: "http://localhost:3000".into() }]
        );
        assert_eq!(app.session().connection(), ConnectionState::Connecting);
    }

    #[test]
    fn connected_joins_and_shows_help() {
        let mut app = app("Ann");
        let _ = app.connect();
        let actions = app.handle(AppEvent::Connected);

        assert!(app.session().is_connected());
        assert!(matches!(actions.first(), Some(AppAction::Render(line)) if line.tone == Tone::Connected));
        assert_eq!(actions.get(1), Some(&AppAction::Emit(OutboundIntent::Join { username: "Ann".into() })));

        let emits = actions.iter().filter(|a| matches!(a, AppAction::Emit(_))).count();
        assert_eq!(emits, 1);

        let help: Vec<_> = actions
            .iter()
            .filter_map(|a| match a {
                AppAction::Render(line) if matches!(line.tone, Tone::Heading | Tone::Help) => {
                    Some(line.text.as_str())
                },
                _ => None,
            })
            .collect();
        assert_eq!(help, HELP_LISTING.to_vec());
    }

    #[test]
    fn disconnect_renders_notice_and_blocks_chat() {
        let mut app = app("Ann");
        let _ = app.handle(AppEvent::Connected);
        let actions = app.handle(AppEvent::Disconnected);

        assert_eq!(app.session().connection(), ConnectionState::Disconnected);
        assert_eq!(
            actions,
            vec![AppAction::Render(ConsoleLine::new(Tone::Disconnected, "Disconnected from server"))]
        );

        let actions = app.handle(AppEvent::Line("still there?".into()));
        assert!(!actions.iter().any(|a| matches!(a, AppAction::Emit(_))));
    }

    #[test]
    fn connect_error_is_fatal() {
        let mut app = app("Ann");
        let _ = app.connect();
        let actions = app.handle(AppEvent::Inbound(InboundEvent::ConnectError {
            reason: "connection refused".into(),
        }));

        assert_eq!(app.session().connection(), ConnectionState::Failed);
        assert_eq!(actions.last(), Some(&AppAction::Exit(ExitStatus::Failure)));
        assert!(matches!(
            actions.first(),
            Some(AppAction::Render(line))
                if line.tone == Tone::Error && line.text.contains("http://localhost:3000")
        ));
    }

    #[test]
    fn interrupt_says_goodbye_and_exits_cleanly() {
        let mut app = app("Ann");
        let actions = app.handle(AppEvent::Interrupt);

        assert_eq!(
            actions,
            vec![
                AppAction::Render(ConsoleLine::new(Tone::Farewell, FAREWELL)),
                AppAction::Disconnect,
                AppAction::Exit(ExitStatus::Success),
            ]
        );
    }
}
