//! Engine.IO v4 / Socket.IO v5 text framing.
//!
//! Every WebSocket text frame carries one [`EnginePacket`]: a single digit
//! packet type followed by an optional body. Engine.IO `message` packets
//! (`4`) wrap a [`SocketPacket`], again a type digit plus body:
//!
//! ```text
//! 0{"sid":"..","pingInterval":25000,..}   engine open
//! 2                                       engine ping (answer with 3)
//! 40                                      socket connect (client -> server)
//! 40{"sid":".."}                          socket connect ack
//! 42["message",{"message":"hi"}]          socket event
//! 44{"message":"not authorized"}          socket connect error
//! ```
//!
//! Only the default namespace is used; a namespace prefix on inbound packets
//! is skipped. Acks and binary packets are rejected as unsupported.

use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    errors::{ProtocolError, Result},
    event::OutboundIntent,
};

/// Engine.IO session parameters from the open packet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    /// Engine.IO session id.
    pub sid: String,
    /// Transports the server would upgrade to.
    #[serde(default)]
    pub upgrades: Vec<String>,
    /// Milliseconds between server pings.
    #[serde(default = "Handshake::default_ping_interval")]
    pub ping_interval: u64,
    /// Milliseconds the server waits for a pong.
    #[serde(default = "Handshake::default_ping_timeout")]
    pub ping_timeout: u64,
}

impl Handshake {
    fn default_ping_interval() -> u64 {
        25_000
    }

    fn default_ping_timeout() -> u64 {
        20_000
    }
}

/// Engine.IO packet.
#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    /// Session opened (server to client).
    Open(Handshake),
    /// Session closed.
    Close,
    /// Heartbeat from the server.
    Ping,
    /// Heartbeat reply.
    Pong,
    /// Socket.IO payload.
    Message(SocketPacket),
    /// Transport upgrade (unused over a plain WebSocket).
    Upgrade,
    /// No-op.
    Noop,
}

impl EnginePacket {
    /// Decode one text frame.
    pub fn decode(text: &str) -> Result<Self> {
        let mut chars = text.chars();
        let kind = chars.next().ok_or(ProtocolError::Empty)?;
        let body = chars.as_str();

        match kind {
            '0' => Ok(Self::Open(serde_json::from_str(body)?)),
            '1' => Ok(Self::Close),
            '2' => Ok(Self::Ping),
            '3' => Ok(Self::Pong),
            '4' => Ok(Self::Message(SocketPacket::decode(body)?)),
            '5' => Ok(Self::Upgrade),
            '6' => Ok(Self::Noop),
            other => Err(ProtocolError::UnknownEngineType(other)),
        }
    }

    /// Encode as one text frame.
    pub fn encode(&self) -> String {
        match self {
            Self::Open(handshake) => format!(
                "0{}",
                json!({
                    "sid": handshake.sid,
                    "upgrades": handshake.upgrades,
                    "pingInterval": handshake.ping_interval,
                    "pingTimeout": handshake.ping_timeout,
                })
            ),
            Self::Close => "1".to_owned(),
            Self::Ping => "2".to_owned(),
            Self::Pong => "3".to_owned(),
            Self::Message(packet) => format!("4{}", packet.encode()),
            Self::Upgrade => "5".to_owned(),
            Self::Noop => "6".to_owned(),
        }
    }
}

/// Socket.IO packet on the default namespace.
#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    /// Namespace connect request (no sid) or acknowledgement (with sid).
    Connect {
        /// Socket id assigned by the server.
        sid: Option<String>,
    },
    /// Namespace disconnect.
    Disconnect,
    /// Named event with JSON arguments.
    Event {
        /// Event name.
        name: String,
        /// Arguments after the name.
        args: Vec<Value>,
    },
    /// Namespace connect refused.
    ConnectError {
        /// Server-provided reason.
        message: String,
    },
}

#[derive(Debug, Default, Deserialize)]
struct ConnectBody {
    #[serde(default)]
    sid: Option<String>,
}

impl SocketPacket {
    /// Event packet for an outbound intent.
    pub fn from_intent(intent: &OutboundIntent) -> Self {
        Self::Event { name: intent.event_name().to_owned(), args: intent.args() }
    }

    /// Decode the body of an Engine.IO message packet.
    pub fn decode(body: &str) -> Result<Self> {
        let mut chars = body.chars();
        let kind = chars.next().ok_or(ProtocolError::Empty)?;
        let rest = skip_namespace(chars.as_str());

        match kind {
            '0' => {
                let connect: ConnectBody =
                    if rest.is_empty() { ConnectBody::default() } else { serde_json::from_str(rest)? };
                Ok(Self::Connect { sid: connect.sid })
            },
            '1' => Ok(Self::Disconnect),
            '2' => decode_event(rest.trim_start_matches(|c: char| c.is_ascii_digit())),
            '4' => Ok(Self::ConnectError { message: connect_error_message(rest) }),
            '3' | '5' | '6' => Err(ProtocolError::Unsupported(kind)),
            other => Err(ProtocolError::UnknownSocketType(other)),
        }
    }

    /// Encode as the body of an Engine.IO message packet.
    pub fn encode(&self) -> String {
        match self {
            Self::Connect { sid: None } => "0".to_owned(),
            Self::Connect { sid: Some(sid) } => format!("0{}", json!({ "sid": sid })),
            Self::Disconnect => "1".to_owned(),
            Self::Event { name, args } => {
                let mut items = Vec::with_capacity(args.len() + 1);
                items.push(Value::String(name.clone()));
                items.extend(args.iter().cloned());
                format!("2{}", Value::Array(items))
            },
            Self::ConnectError { message } => format!("4{}", json!({ "message": message })),
        }
    }
}

/// Strip a `/namespace,` prefix.
fn skip_namespace(rest: &str) -> &str {
    if !rest.starts_with('/') {
        return rest;
    }
    rest.split_once(',').map_or("", |(_, tail)| tail)
}

fn decode_event(body: &str) -> Result<SocketPacket> {
    let items: Vec<Value> = serde_json::from_str(body)?;
    let mut items = items.into_iter();

    let name = match items.next() {
        Some(Value::String(name)) => name,
        Some(other) => return Err(ProtocolError::MalformedEvent(format!("event name {other}"))),
        None => return Err(ProtocolError::MalformedEvent("empty event array".into())),
    };

    Ok(SocketPacket::Event { name, args: items.collect() })
}

fn connect_error_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("message") {
            Some(Value::String(message)) => message.clone(),
            Some(other) => other.to_string(),
            None => Value::Object(map).to_string(),
        },
        Ok(Value::String(message)) => message,
        Ok(other) => other.to_string(),
        Err(_) => body.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_open() {
        let packet = EnginePacket::decode(
            r#"0{"sid":"abc","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#,
        );

        assert!(matches!(
            packet,
            Ok(EnginePacket::Open(Handshake { ref sid, ping_interval: 25_000, .. })) if sid == "abc"
        ));
    }

    #[test]
    fn decode_ping_ignores_probe_body() {
        assert!(matches!(EnginePacket::decode("2probe"), Ok(EnginePacket::Ping)));
    }

    #[test]
    fn decode_connect_ack() {
        let packet = EnginePacket::decode(r#"40{"sid":"xyz"}"#);
        assert!(matches!(
            packet,
            Ok(EnginePacket::Message(SocketPacket::Connect { sid: Some(ref sid) })) if sid == "xyz"
        ));
    }

    #[test]
    fn decode_event_with_namespace_and_ack_id() {
        let packet = EnginePacket::decode(r#"42/chat,17["typing",{"username":"Bob"}]"#);
        assert!(matches!(
            &packet,
            Ok(EnginePacket::Message(SocketPacket::Event { name, args }))
                if name == "typing" && *args == vec![json!({ "username": "Bob" })]
        ));
    }

    #[test]
    fn decode_connect_error_variants() {
        let from_object = SocketPacket::decode(r#"4{"message":"nope"}"#);
        assert!(matches!(from_object, Ok(SocketPacket::ConnectError { ref message }) if message == "nope"));

        let from_string = SocketPacket::decode(r#"4"denied""#);
        assert!(matches!(from_string, Ok(SocketPacket::ConnectError { ref message }) if message == "denied"));
    }

    #[test]
    fn event_name_must_be_string() {
        assert!(matches!(SocketPacket::decode("2[42]"), Err(ProtocolError::MalformedEvent(_))));
        assert!(matches!(SocketPacket::decode("2[]"), Err(ProtocolError::MalformedEvent(_))));
    }

    #[test]
    fn acks_are_unsupported() {
        assert!(matches!(SocketPacket::decode("31[]"), Err(ProtocolError::Unsupported('3'))));
    }

    #[test]
    fn unknown_types_are_rejected() {
        assert!(matches!(EnginePacket::decode("9"), Err(ProtocolError::UnknownEngineType('9'))));
        assert!(matches!(EnginePacket::decode(""), Err(ProtocolError::Empty)));
        assert!(matches!(SocketPacket::decode("x"), Err(ProtocolError::UnknownSocketType('x'))));
    }

    #[test]
    fn encode_client_packets() {
        let connect = EnginePacket::Message(SocketPacket::Connect { sid: None });
        assert_eq!(connect.encode(), "40");
        assert_eq!(EnginePacket::Pong.encode(), "3");

        let chat = OutboundIntent::ChatMessage { text: "hello".into() };
        let event = EnginePacket::Message(SocketPacket::from_intent(&chat));
        assert_eq!(event.encode(), r#"42["message",{"message":"hello"}]"#);

        let users = EnginePacket::Message(SocketPacket::from_intent(&OutboundIntent::RequestUsersList));
        assert_eq!(users.encode(), r#"42["get_users"]"#);

        let leave = EnginePacket::Message(SocketPacket::Disconnect);
        assert_eq!(leave.encode(), "41");
    }
}
