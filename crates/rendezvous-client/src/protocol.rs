//! Sans-IO Engine.IO / Socket.IO session.
//!
//! [`EngineSession`] consumes WebSocket text frames and produces frames to
//! send back plus [`TransportEvent`]s for the application. It never touches
//! a socket, so the handshake and heartbeat rules are tested without one.

use std::time::Duration;

use rendezvous_proto::{EnginePacket, Handshake, InboundEvent, OutboundIntent, SocketPacket};

/// Connection-level events surfaced to the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Socket.IO namespace connect acknowledged.
    Connected,
    /// Connection closed after having connected.
    Disconnected,
    /// Named server event, or a connect failure.
    Inbound(InboundEvent),
}

/// What the transport should do after feeding a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutput {
    /// Send a text frame.
    Send(String),
    /// Hand an event to the application.
    Event(TransportEvent),
    /// Close the WebSocket.
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    AwaitingOpen,
    AwaitingConnect,
    Connected,
    Closed,
}

/// Client side of one Engine.IO session over a WebSocket.
#[derive(Debug)]
pub struct EngineSession {
    phase: Phase,
    handshake: Option<Handshake>,
}

impl Default for EngineSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineSession {
    /// Session waiting for the server's open packet.
    pub fn new() -> Self {
        Self { phase: Phase::AwaitingOpen, handshake: None }
    }

    /// Whether the namespace handshake has completed and not yet ended.
    pub fn is_connected(&self) -> bool {
        self.phase == Phase::Connected
    }

    /// Whether the session has ended.
    pub fn is_closed(&self) -> bool {
        self.phase == Phase::Closed
    }

    /// How long the server may stay silent before the connection counts as
    /// dead: one ping interval plus the ping timeout.
    ///
    /// `None` until the open packet arrives.
    pub fn heartbeat_window(&self) -> Option<Duration> {
        self.handshake
            .as_ref()
            .map(|h| Duration::from_millis(h.ping_interval.saturating_add(h.ping_timeout)))
    }

    /// Feed one text frame from the server.
    ///
    /// Frames that fail to decode are logged and dropped.
    pub fn handle_text(&mut self, text: &str) -> Vec<SessionOutput> {
        if self.phase == Phase::Closed {
            return vec![];
        }

        let packet = match EnginePacket::decode(text) {
            Ok(packet) => packet,
            Err(error) => {
                tracing::warn!(%error, frame = text, "dropping undecodable frame");
                return vec![];
            },
        };

        match packet {
            EnginePacket::Open(handshake) => self.on_open(handshake),
            EnginePacket::Ping => vec![SessionOutput::Send(EnginePacket::Pong.encode())],
            EnginePacket::Close => {
                tracing::debug!("server closed the engine session");
                self.close_with("server closed the connection")
            },
            EnginePacket::Message(packet) => self.on_socket_packet(packet),
            EnginePacket::Pong | EnginePacket::Upgrade | EnginePacket::Noop => vec![],
        }
    }

    /// Frame for an outbound intent, or `None` if the session cannot carry
    /// it yet.
    pub fn encode(&self, intent: &OutboundIntent) -> Option<String> {
        if !self.is_connected() {
            tracing::debug!(event = intent.event_name(), phase = ?self.phase, "dropping outbound event");
            return None;
        }
        Some(EnginePacket::Message(SocketPacket::from_intent(intent)).encode())
    }

    /// End the session locally. Returns the namespace disconnect frame if
    /// the server should be told.
    pub fn disconnect(&mut self) -> Option<String> {
        let was_connected = self.is_connected();
        self.phase = Phase::Closed;
        was_connected.then(|| EnginePacket::Message(SocketPacket::Disconnect).encode())
    }

    /// The WebSocket ended underneath the session.
    ///
    /// Returns the event the application should see, if any.
    pub fn transport_closed(&mut self, reason: &str) -> Option<TransportEvent> {
        let event = match self.phase {
            Phase::Connected => Some(TransportEvent::Disconnected),
            Phase::AwaitingOpen | Phase::AwaitingConnect => Some(connect_error(reason)),
            Phase::Closed => None,
        };
        self.phase = Phase::Closed;
        event
    }

    fn on_open(&mut self, handshake: Handshake) -> Vec<SessionOutput> {
        if self.phase != Phase::AwaitingOpen {
            tracing::warn!("ignoring repeated open packet");
            return vec![];
        }

        tracing::debug!(
            sid = %handshake.sid,
            ping_interval = handshake.ping_interval,
            ping_timeout = handshake.ping_timeout,
            "engine session open"
        );
        self.handshake = Some(handshake);
        self.phase = Phase::AwaitingConnect;
        vec![SessionOutput::Send(EnginePacket::Message(SocketPacket::Connect { sid: None }).encode())]
    }

    fn on_socket_packet(&mut self, packet: SocketPacket) -> Vec<SessionOutput> {
        match packet {
            SocketPacket::Connect { sid } => {
                if self.phase != Phase::AwaitingConnect {
                    tracing::warn!(phase = ?self.phase, "ignoring unexpected connect packet");
                    return vec![];
                }
                tracing::debug!(sid = sid.as_deref().unwrap_or_default(), "namespace connected");
                self.phase = Phase::Connected;
                vec![SessionOutput::Event(TransportEvent::Connected)]
            },
            SocketPacket::ConnectError { message } => self.close_with(&message),
            SocketPacket::Disconnect => {
                tracing::debug!("server disconnected the namespace");
                self.close_with("server refused the connection")
            },
            SocketPacket::Event { name, args } => {
                if !self.is_connected() {
                    tracing::warn!(event = %name, "dropping event received before connect");
                    return vec![];
                }
                match InboundEvent::from_wire(&name, args) {
                    Ok(Some(event)) => vec![SessionOutput::Event(TransportEvent::Inbound(event))],
                    Ok(None) => {
                        tracing::debug!(event = %name, "ignoring unknown event");
                        vec![]
                    },
                    Err(error) => {
                        tracing::warn!(event = %name, %error, "dropping malformed event");
                        vec![]
                    },
                }
            },
        }
    }

    fn close_with(&mut self, reason: &str) -> Vec<SessionOutput> {
        match self.transport_closed(reason) {
            Some(event) => vec![SessionOutput::Event(event), SessionOutput::Close],
            None => vec![SessionOutput::Close],
        }
    }
}

fn connect_error(reason: &str) -> TransportEvent {
    TransportEvent::Inbound(InboundEvent::ConnectError { reason: reason.to_owned() })
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPEN: &str = r#"0{"sid":"e1","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#;

    fn connected() -> EngineSession {
        let mut session = EngineSession::new();
        let _ = session.handle_text(OPEN);
        let _ = session.handle_text(r#"40{"sid":"s1"}"#);
        session
    }

    #[test]
    fn handshake_sends_namespace_connect_then_reports_connected() {
        let mut session = EngineSession::new();

        assert_eq!(session.handle_text(OPEN), vec![SessionOutput::Send("40".into())]);
        assert!(!session.is_connected());
        assert_eq!(session.heartbeat_window(), Some(Duration::from_secs(45)));

        assert_eq!(
            session.handle_text(r#"40{"sid":"s1"}"#),
            vec![SessionOutput::Event(TransportEvent::Connected)]
        );
        assert!(session.is_connected());
    }

    #[test]
    fn ping_is_answered() {
        let mut session = connected();
        assert_eq!(session.handle_text("2"), vec![SessionOutput::Send("3".into())]);
    }

    #[test]
    fn outbound_is_dropped_until_connected() {
        let mut session = EngineSession::new();
        assert_eq!(session.encode(&OutboundIntent::RequestUsersList), None);

        let _ = session.handle_text(OPEN);
        assert_eq!(session.encode(&OutboundIntent::Join { username: "Ann".into() }), None);

        let _ = session.handle_text("40");
        assert_eq!(
            session.encode(&OutboundIntent::Join { username: "Ann".into() }).as_deref(),
            Some(r#"42["join","Ann"]"#)
        );
        assert_eq!(session.encode(&OutboundIntent::RequestUsersList).as_deref(), Some(r#"42["get_users"]"#));
    }

    #[test]
    fn events_decode_in_order() {
        let mut session = connected();

        let out = session.handle_text(r#"42["user_joined",{"message":"Bob joined the chat"}]"#);
        assert_eq!(
            out,
            vec![SessionOutput::Event(TransportEvent::Inbound(InboundEvent::UserJoined {
                text: "Bob joined the chat".into()
            }))]
        );

        let out = session.handle_text(r#"42["typing",{"username":"Bob","isTyping":true}]"#);
        assert_eq!(
            out,
            vec![SessionOutput::Event(TransportEvent::Inbound(InboundEvent::TypingNotice {
                username: "Bob".into(),
                is_typing: true,
            }))]
        );
    }

    #[test]
    fn unknown_and_malformed_events_are_dropped() {
        let mut session = connected();

        assert!(session.handle_text(r#"42["reaction",{"emoji":"+1"}]"#).is_empty());
        assert!(session.handle_text(r#"42["message","not an object"]"#).is_empty());
        assert!(session.handle_text("not a packet").is_empty());
        assert!(session.is_connected());
    }

    #[test]
    fn connect_error_is_reported_and_closes() {
        let mut session = EngineSession::new();
        let _ = session.handle_text(OPEN);

        let out = session.handle_text(r#"44{"message":"Not authorized"}"#);
        assert_eq!(
            out,
            vec![
                SessionOutput::Event(TransportEvent::Inbound(InboundEvent::ConnectError {
                    reason: "Not authorized".into()
                })),
                SessionOutput::Close,
            ]
        );
        assert!(session.is_closed());
        assert!(session.handle_text("2").is_empty());
    }

    #[test]
    fn server_disconnect_after_connect_is_a_disconnect() {
        let mut session = connected();

        assert_eq!(
            session.handle_text("41"),
            vec![SessionOutput::Event(TransportEvent::Disconnected), SessionOutput::Close]
        );
        assert_eq!(session.transport_closed("eof"), None);
    }

    #[test]
    fn socket_loss_before_connect_is_a_connect_error() {
        let mut session = EngineSession::new();

        assert_eq!(
            session.transport_closed("connection reset"),
            Some(connect_error("connection reset"))
        );
    }

    #[test]
    fn local_disconnect_tells_server_only_when_connected() {
        let mut session = connected();
        assert_eq!(session.disconnect().as_deref(), Some("41"));
        assert_eq!(session.disconnect(), None);

        let mut pending = EngineSession::new();
        assert_eq!(pending.disconnect(), None);
    }
}
