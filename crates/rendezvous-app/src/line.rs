//! Console output lines.
//!
//! The app decides what to say and in which tone; the driver decides what
//! that tone looks like.

/// Semantic tone of a console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    /// Startup banner.
    Banner,
    /// Progress notes and hints.
    Muted,
    /// Handshake succeeded.
    Connected,
    /// Connection lost.
    Disconnected,
    /// Server announcement.
    Announcement,
    /// Chat message from another user.
    Incoming,
    /// Chat message sent by the local user.
    Outgoing,
    /// A user joined.
    Joined,
    /// A user left.
    Left,
    /// Online user list.
    Roster,
    /// Someone is typing.
    Typing,
    /// Help listing heading.
    Heading,
    /// Help listing entry.
    Help,
    /// Something went wrong.
    Error,
    /// Goodbye.
    Farewell,
}

/// One line of console output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    /// How the line should look.
    pub tone: Tone,
    /// Unstyled text.
    pub text: String,
}

impl ConsoleLine {
    /// Create a line.
    pub fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self { tone, text: text.into() }
    }
}
