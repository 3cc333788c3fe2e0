//! Application input events.
//!
//! This module defines [`AppEvent`], the set of inputs that drive the
//! [`crate::App`] state machine.
//!
//! Events come from three sources, interleaved by the runtime:
//! - the transport (lifecycle changes and named server events),
//! - the terminal line reader (one event per completed line),
//! - the process interrupt signal.

use rendezvous_proto::InboundEvent;

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Transport handshake completed.
    Connected,

    /// Transport closed after having connected.
    Disconnected,

    /// Event from the server (or a connect failure).
    Inbound(InboundEvent),

    /// One completed line of terminal input, untrimmed.
    Line(String),

    /// Interrupt signal (Ctrl+C).
    Interrupt,
}
