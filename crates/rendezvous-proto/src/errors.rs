//! Protocol error types.

use thiserror::Error;

/// Errors raised while decoding or encoding wire data.
///
/// None of these are fatal to a session: the caller logs the error and drops
/// the offending packet.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Text frame with no packet type.
    #[error("empty packet")]
    Empty,

    /// First character is not a known Engine.IO packet type.
    #[error("unknown engine packet type {0:?}")]
    UnknownEngineType(char),

    /// Socket.IO packet type is not one of the known types.
    #[error("unknown socket packet type {0:?}")]
    UnknownSocketType(char),

    /// Known Socket.IO packet type this client never handles (acks, binary).
    #[error("unsupported socket packet type {0:?}")]
    Unsupported(char),

    /// Event packet whose body is not `["name", ...args]`.
    #[error("malformed event packet: {0}")]
    MalformedEvent(String),

    /// Event payload does not match the shape expected for its name.
    #[error("invalid payload for {event}: {source}")]
    InvalidPayload {
        /// Event name.
        event: &'static str,
        /// Underlying decode failure.
        source: serde_json::Error,
    },

    /// JSON syntax error in a packet body.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
