//! Client
//!
//! Connection plumbing for the Rendezvous chat client.
//!
//! # Architecture
//!
//! [`EngineSession`] is a sans-IO state machine for the Engine.IO v4 /
//! Socket.IO handshake, heartbeat and event framing. It is fed text frames
//! and returns frames to send plus [`TransportEvent`]s for the application.
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides:
//! - [`transport::SocketClient`]: WebSocket connection driven by a background
//!   task
//! - [`transport::endpoint_url`]: server address to WebSocket endpoint

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod protocol;

#[cfg(feature = "transport")]
pub mod transport;

pub use protocol::{EngineSession, SessionOutput, TransportEvent};
