//! Observable session state.
//!
//! [`Session`] is the process-lifetime record of who the local user is and
//! whether the transport is usable. It is owned by the [`crate::App`]; the
//! username is fixed at construction and only connection lifecycle handling
//! changes the [`ConnectionState`].

use rand::Rng;

/// Connection lifecycle.
///
/// `Disconnected -> Connecting -> Connected -> Disconnected`, or
/// `Connecting -> Failed` which ends the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No transport, or the transport closed.
    Disconnected,
    /// Transport started, handshake pending.
    Connecting,
    /// Handshake completed; chat messages may be sent.
    Connected,
    /// Handshake failed.
    Failed,
}

/// The local user's session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    username: String,
    connection: ConnectionState,
}

impl Session {
    /// Create the session from the username prompt answer.
    ///
    /// The answer is trimmed; a blank answer gets a [`default_username`].
    pub fn new<R: Rng>(answer: &str, rng: &mut R) -> Self {
        let trimmed = answer.trim();
        let username =
            if trimmed.is_empty() { default_username(rng) } else { trimmed.to_owned() };
        Self { username, connection: ConnectionState::Disconnected }
    }

    /// Local username. Never empty.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Current connection state.
    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    /// Whether chat messages may be sent.
    pub fn is_connected(&self) -> bool {
        self.connection == ConnectionState::Connected
    }

    pub(crate) fn set_connection(&mut self, next: ConnectionState) {
        tracing::debug!(from = ?self.connection, to = ?next, "connection state");
        self.connection = next;
    }
}

/// Placeholder name: `User` followed by a number in `0..=999`.
pub fn default_username<R: Rng>(rng: &mut R) -> String {
    format!("User{}", rng.random_range(0..1000u16))
}
