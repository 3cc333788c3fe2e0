//! Audible notification for incoming messages.
//!
//! Fire and forget: a failing sound never affects the chat.

use std::{
    io::{self, Write},
    process::Stdio,
};

/// Sound played on macOS when no command is configured.
pub const MACOS_SOUND: &str = "afplay /System/Library/Sounds/Ping.aiff";

/// Something that can make a noise.
pub trait Notifier: Send {
    /// Make the noise. Must not block.
    fn notify(&mut self);
}

/// Does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Notifier for Silent {
    fn notify(&mut self) {}
}

/// Rings the terminal bell on standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bell;

impl Notifier for Bell {
    fn notify(&mut self) {
        let mut out = io::stdout();
        if let Err(e) = out.write_all(b"\x07").and_then(|()| out.flush()) {
            tracing::debug!(error = %e, "bell failed");
        }
    }
}

/// Runs an external program, without waiting for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundCommand {
    program: String,
    args: Vec<String>,
}

impl SoundCommand {
    /// Parse a whitespace-separated command line. `None` if blank.
    pub fn parse(command: &str) -> Option<Self> {
        let mut words = command.split_whitespace().map(str::to_owned);
        let program = words.next()?;
        Some(Self { program, args: words.collect() })
    }

    /// Program to run.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to the program.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Notifier for SoundCommand {
    fn notify(&mut self) {
        let spawned = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        // The child is reaped in the background once dropped.
        if let Err(e) = spawned {
            tracing::debug!(program = %self.program, error = %e, "sound command failed");
        }
    }
}

/// Which notifier the options call for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierKind {
    /// [`Silent`].
    Silent,
    /// [`Bell`].
    Bell,
    /// An external [`SoundCommand`].
    Command(SoundCommand),
}

impl NotifierKind {
    /// Resolve the options against a platform `fallback` command.
    ///
    /// `no_sound` wins, then an explicit command, then the fallback. A blank
    /// command rings the bell.
    pub fn choose(no_sound: bool, command: Option<&str>, fallback: Option<&str>) -> Self {
        if no_sound {
            return Self::Silent;
        }
        match command.or(fallback).and_then(SoundCommand::parse) {
            Some(sound) => Self::Command(sound),
            None => Self::Bell,
        }
    }

    /// Build the notifier.
    pub fn into_notifier(self) -> Box<dyn Notifier> {
        match self {
            Self::Silent => Box::new(Silent),
            Self::Bell => Box::new(Bell),
            Self::Command(sound) => {
                tracing::debug!(program = sound.program(), "using sound command");
                Box::new(sound)
            },
        }
    }
}

/// Platform default sound: [`MACOS_SOUND`] on macOS, none elsewhere.
pub fn platform_sound() -> Option<&'static str> {
    cfg!(target_os = "macos").then_some(MACOS_SOUND)
}

/// Pick the notifier for the given options on this platform.
pub fn select(no_sound: bool, command: Option<&str>) -> Box<dyn Notifier> {
    NotifierKind::choose(no_sound, command, platform_sound()).into_notifier()
}
