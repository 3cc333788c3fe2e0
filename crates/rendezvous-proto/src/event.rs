//! Named chat events.
//!
//! The server speaks in named events carrying JSON arguments. This module maps
//! those names and payload shapes onto [`InboundEvent`] (server to client) and
//! [`OutboundIntent`] (client to server). Lifecycle notifications (`connect`,
//! `disconnect`) are not events on the wire; the transport synthesizes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};

use crate::errors::{ProtocolError, Result};

/// Event names used on the wire.
pub mod names {
    /// Server announcement.
    pub const SYSTEM_MESSAGE: &str = "system_message";
    /// Chat message, in both directions.
    pub const MESSAGE: &str = "message";
    /// Another user joined.
    pub const USER_JOINED: &str = "user_joined";
    /// Another user left.
    pub const USER_LEFT: &str = "user_left";
    /// Reply to [`GET_USERS`].
    pub const USERS_LIST: &str = "users_list";
    /// Typing indicator.
    pub const TYPING: &str = "typing";
    /// Session announcement sent after connecting.
    pub const JOIN: &str = "join";
    /// Request for the online user list.
    pub const GET_USERS: &str = "get_users";
}

/// An event received from the server.
///
/// Ephemeral: consumed and rendered, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// Server-wide announcement.
    SystemMessage {
        /// Announcement text.
        text: String,
    },

    /// Chat message from some user (possibly ourselves).
    ChatMessage {
        /// Author's username.
        username: String,
        /// Message body.
        text: String,
        /// When the server stamped the message. `None` if absent or not
        /// understood.
        timestamp: Option<Timestamp>,
    },

    /// Presence notice: a user joined.
    UserJoined {
        /// Server-formatted notice.
        text: String,
    },

    /// Presence notice: a user left.
    UserLeft {
        /// Server-formatted notice.
        text: String,
    },

    /// Users currently online, in server order.
    UsersList {
        /// One entry per user.
        entries: Vec<UserEntry>,
    },

    /// Typing indicator for another user.
    TypingNotice {
        /// Who is typing.
        username: String,
        /// `false` when the user stopped typing.
        is_typing: bool,
    },

    /// Connection could not be established.
    ConnectError {
        /// Human-readable cause.
        reason: String,
    },
}

/// One entry of a `users_list` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntry {
    /// Display name.
    pub username: String,
}

impl UserEntry {
    /// Decode one roster entry. `None` if it carries no usable name.
    fn from_value(value: Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }
}

/// Message timestamp as sent by the server.
///
/// Servers send either epoch milliseconds or an ISO 8601 string, whatever
/// their `Date` serialized to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timestamp {
    /// Milliseconds since the Unix epoch.
    Millis(i64),
    /// RFC 3339 text, or digits that failed to arrive as a number.
    Text(String),
}

impl Timestamp {
    /// Interpret a raw JSON value. `None` for values that cannot be a time.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)).map(Self::Millis),
            Value::String(s) => Some(Self::Text(s)),
            _ => None,
        }
    }

    /// Raw JSON form.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Millis(ms) => json!(ms),
            Self::Text(text) => json!(text),
        }
    }

    /// Absolute instant in UTC. `None` if the value is out of range or
    /// unparseable.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Millis(ms) => DateTime::<Utc>::from_timestamp_millis(*ms),
            Self::Text(text) => DateTime::parse_from_rfc3339(text)
                .map(|t| t.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    text.trim().parse::<i64>().ok().and_then(DateTime::<Utc>::from_timestamp_millis)
                }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Notice {
    message: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatPayload {
    username: String,
    message: String,
    #[serde(default)]
    timestamp: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TypingPayload {
    username: String,
    #[serde(rename = "isTyping", default)]
    is_typing: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct OutgoingChat {
    message: String,
}

fn decode<T: DeserializeOwned>(event: &'static str, payload: Value) -> Result<T> {
    serde_json::from_value(payload).map_err(|source| ProtocolError::InvalidPayload { event, source })
}

fn first_arg(args: Vec<Value>) -> Value {
    args.into_iter().next().unwrap_or(Value::Null)
}

impl InboundEvent {
    /// Decode a named server event.
    ///
    /// Returns `Ok(None)` for event names this client does not know; callers
    /// ignore those. Extra arguments beyond the first are ignored.
    pub fn from_wire(name: &str, args: Vec<Value>) -> Result<Option<Self>> {
        let payload = first_arg(args);
        let event = match name {
            names::SYSTEM_MESSAGE => {
                let notice: Notice = decode(names::SYSTEM_MESSAGE, payload)?;
                Self::SystemMessage { text: notice.message }
            },
            names::MESSAGE => {
                let chat: ChatPayload = decode(names::MESSAGE, payload)?;
                Self::ChatMessage {
                    username: chat.username,
                    text: chat.message,
                    timestamp: chat.timestamp.and_then(Timestamp::from_value),
                }
            },
            names::USER_JOINED => {
                let notice: Notice = decode(names::USER_JOINED, payload)?;
                Self::UserJoined { text: notice.message }
            },
            names::USER_LEFT => {
                let notice: Notice = decode(names::USER_LEFT, payload)?;
                Self::UserLeft { text: notice.message }
            },
            names::USERS_LIST => {
                let raw: Vec<Value> = decode(names::USERS_LIST, payload)?;
                Self::UsersList { entries: raw.into_iter().filter_map(UserEntry::from_value).collect() }
            },
            names::TYPING => {
                let typing: TypingPayload = decode(names::TYPING, payload)?;
                Self::TypingNotice { username: typing.username, is_typing: typing.is_typing }
            },
            _ => return Ok(None),
        };
        Ok(Some(event))
    }

    /// Encode as a named server event.
    ///
    /// `None` for [`InboundEvent::ConnectError`], which is a transport
    /// condition rather than an event.
    pub fn to_wire(&self) -> Option<(&'static str, Vec<Value>)> {
        let encoded = match self {
            Self::SystemMessage { text } => (names::SYSTEM_MESSAGE, json!({ "message": text })),
            Self::ChatMessage { username, text, timestamp } => (
                names::MESSAGE,
                json!({
                    "username": username,
                    "message": text,
                    "timestamp": timestamp.as_ref().map_or(Value::Null, Timestamp::to_value),
                }),
            ),
            Self::UserJoined { text } => (names::USER_JOINED, json!({ "message": text })),
            Self::UserLeft { text } => (names::USER_LEFT, json!({ "message": text })),
            Self::UsersList { entries } => (names::USERS_LIST, json!(entries)),
            Self::TypingNotice { username, is_typing } => {
                (names::TYPING, json!({ "username": username, "isTyping": is_typing }))
            },
            Self::ConnectError { .. } => return None,
        };
        Some((encoded.0, vec![encoded.1]))
    }
}

/// Something the client asks the server to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundIntent {
    /// Announce the session. Sent once per successful connect.
    Join {
        /// Local username.
        username: String,
    },

    /// Broadcast a chat message.
    ChatMessage {
        /// Message body (already trimmed).
        text: String,
    },

    /// Ask for the online user list; answered by a `users_list` event.
    RequestUsersList,
}

impl OutboundIntent {
    /// Wire event name.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Join { .. } => names::JOIN,
            Self::ChatMessage { .. } => names::MESSAGE,
            Self::RequestUsersList => names::GET_USERS,
        }
    }

    /// Wire arguments.
    pub fn args(&self) -> Vec<Value> {
        match self {
            Self::Join { username } => vec![json!(username)],
            Self::ChatMessage { text } => vec![json!({ "message": text })],
            Self::RequestUsersList => Vec::new(),
        }
    }

    /// Decode a named client event, as a server would.
    ///
    /// Returns `Ok(None)` for unknown names.
    pub fn from_wire(name: &str, args: Vec<Value>) -> Result<Option<Self>> {
        let intent = match name {
            names::JOIN => Self::Join { username: decode(names::JOIN, first_arg(args))? },
            names::MESSAGE => {
                let chat: OutgoingChat = decode(names::MESSAGE, first_arg(args))?;
                Self::ChatMessage { text: chat.message }
            },
            names::GET_USERS => Self::RequestUsersList,
            _ => return Ok(None),
        };
        Ok(Some(intent))
    }
}
