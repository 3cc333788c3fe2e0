//! Wire protocol for Rendezvous chat
//!
//! Two layers live here:
//!
//! - [`InboundEvent`] / [`OutboundIntent`]: the named chat events exchanged
//!   with the server, independent of how they are framed.
//! - [`EnginePacket`] / [`SocketPacket`]: the Engine.IO v4 / Socket.IO text
//!   framing those events travel in over a WebSocket.
//!
//! Pure data and codecs, no I/O.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod errors;
pub mod event;
pub mod packet;

pub use errors::{ProtocolError, Result};
pub use event::{InboundEvent, OutboundIntent, Timestamp, UserEntry, names};
pub use packet::{EnginePacket, Handshake, SocketPacket};
