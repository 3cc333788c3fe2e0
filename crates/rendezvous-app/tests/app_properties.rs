//! Property-based tests for the App state machine.
//!
//! Tests verify that the rendering and input rules hold for arbitrary
//! usernames, message text and input lines.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rand::{SeedableRng, rngs::StdRng};
use rendezvous_app::{
    App, AppAction, AppEvent, COMMAND_PREFIX, Command, CommandLine, ExitStatus, FixedClock,
    HELP_LISTING, Session, Tone,
};
use rendezvous_proto::{InboundEvent, OutboundIntent, Timestamp};

fn app(name: &str) -> App<FixedClock> {
    let mut rng = StdRng::seed_from_u64(7);
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 15, 4, 5).single().expect("valid date");
    App::new(Session::new(name, &mut rng), "localhost:3000", FixedClock::utc(now))
}

fn connected(name: &str) -> App<FixedClock> {
    let mut app = app(name);
    let _ = app.connect();
    let _ = app.handle(AppEvent::Connected);
    app
}

fn renders(actions: &[AppAction]) -> usize {
    actions.iter().filter(|a| matches!(a, AppAction::Render(_))).count()
}

fn emits(actions: &[AppAction]) -> Vec<&OutboundIntent> {
    actions
        .iter()
        .filter_map(|a| match a {
            AppAction::Emit(intent) => Some(intent),
            _ => None,
        })
        .collect()
}

fn notifications(actions: &[AppAction]) -> usize {
    actions.iter().filter(|a| **a == AppAction::Notify).count()
}

/// Usernames as a user would type them: non-blank, already trimmed.
fn username_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_]{0,11}"
}

fn timestamp_strategy() -> impl Strategy<Value = Option<Timestamp>> {
    prop_oneof![
        Just(None),
        (0i64..4_102_444_800_000).prop_map(|ms| Some(Timestamp::Millis(ms))),
        "[ -~]{0,24}".prop_map(|text| Some(Timestamp::Text(text))),
    ]
}

/// Chat text: non-blank after trimming and not a command.
fn chat_text_strategy() -> impl Strategy<Value = String> {
    "[ \t]{0,3}[A-Za-z0-9!?.,][ -~]{0,40}"
}

proptest! {
    #[test]
    fn own_messages_never_render_or_notify(
        name in username_strategy(),
        text in ".{0,40}",
        timestamp in timestamp_strategy(),
    ) {
        let mut app = connected(&name);
        let actions = app.handle(AppEvent::Inbound(InboundEvent::ChatMessage {
            username: name.clone(),
            text,
            timestamp,
        }));

        prop_assert!(actions.is_empty());
    }

    #[test]
    fn foreign_messages_render_and_notify_once(
        name in username_strategy(),
        sender in username_strategy(),
        text in ".{0,40}",
        timestamp in timestamp_strategy(),
    ) {
        prop_assume!(name != sender);
        let mut app = connected(&name);
        let actions = app.handle(AppEvent::Inbound(InboundEvent::ChatMessage {
            username: sender.clone(),
            text: text.clone(),
            timestamp,
        }));

        prop_assert_eq!(renders(&actions), 1);
        prop_assert_eq!(notifications(&actions), 1);
        let rendered_sender = matches!(
            actions.first(),
            Some(AppAction::Render(line))
                if line.tone == Tone::Incoming && line.text.ends_with(&format!("] {sender}: {text}"))
        );
        prop_assert!(rendered_sender);
    }

    #[test]
    fn blank_lines_are_ignored(line in "[ \t\r\n]{0,10}", connect in any::<bool>()) {
        let mut app = if connect { connected("Ann") } else { app("Ann") };
        let actions = app.handle(AppEvent::Line(line));

        prop_assert!(actions.is_empty());
    }

    #[test]
    fn connected_chat_emits_once_and_echoes_once(name in username_strategy(), line in chat_text_strategy()) {
        let mut app = connected(&name);
        let actions = app.handle(AppEvent::Line(line.clone()));

        let text = line.trim().to_owned();
        let expected = OutboundIntent::ChatMessage { text: text.clone() };
        prop_assert_eq!(emits(&actions), vec![&expected]);
        prop_assert_eq!(renders(&actions), 1);
        let echoed = actions.iter().any(|a| matches!(
            a,
            AppAction::Render(line) if line.tone == Tone::Outgoing && line.text == format!("[15:04:05] You: {text}")
        ));
        prop_assert!(echoed);
    }

    #[test]
    fn disconnected_chat_is_rejected(line in chat_text_strategy(), drop_after_connect in any::<bool>()) {
        let mut app = if drop_after_connect {
            let mut app = connected("Ann");
            let _ = app.handle(AppEvent::Disconnected);
            app
        } else {
            app("Ann")
        };
        let actions = app.handle(AppEvent::Line(line));

        prop_assert!(emits(&actions).is_empty());
        prop_assert_eq!(renders(&actions), 1);
        let rejected = actions.iter().any(|a| matches!(a, AppAction::Render(line) if line.tone == Tone::Error));
        prop_assert!(rejected);
    }

    #[test]
    fn command_dispatch_is_total(rest in "[ -~]{0,20}") {
        let input = format!("{COMMAND_PREFIX}{rest}");
        let parsed = CommandLine::parse(input.trim());

        let mut app = connected("Ann");
        let actions = app.handle(AppEvent::Line(input.clone()));
        if input.trim().is_empty() {
            return Ok(());
        }
        prop_assert_eq!(actions.first(), Some(&AppAction::EraseInputLine));
        let body = &actions[1..];

        match parsed.command {
            Command::Help => prop_assert_eq!(renders(body), HELP_LISTING.len()),
            Command::Quit => prop_assert_eq!(body.last(), Some(&AppAction::Exit(ExitStatus::Success))),
            Command::Users => prop_assert_eq!(body, &[AppAction::Emit(OutboundIntent::RequestUsersList)][..]),
            Command::Clear => prop_assert_eq!(body, &[AppAction::ClearScreen][..]),
            Command::Unknown { .. } => {
                prop_assert_eq!(renders(body), 1 + HELP_LISTING.len());
                prop_assert!(emits(body).is_empty());
            },
        }
    }

    #[test]
    fn typing_stopped_is_silent(name in username_strategy()) {
        let mut app = connected("Ann");
        let actions = app.handle(AppEvent::Inbound(InboundEvent::TypingNotice {
            username: name,
            is_typing: false,
        }));

        prop_assert!(actions.is_empty());
    }
}
