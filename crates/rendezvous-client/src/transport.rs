//! WebSocket transport for the client.
//!
//! Provides [`SocketClient`], which handles WebSocket I/O for one chat
//! session. This is a thin layer that moves text frames between the socket
//! and channels; protocol logic stays in the sans-IO [`EngineSession`].

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use rendezvous_proto::OutboundIntent;
use thiserror::Error;
use tokio::{sync::mpsc, task::JoinHandle, time::Instant};
use tokio_tungstenite::tungstenite::Message;
use url::Url;

use crate::{EngineSession, SessionOutput, TransportEvent};

/// Socket.IO endpoint path.
pub const SOCKET_IO_PATH: &str = "/socket.io/";

/// Engine.IO protocol revision.
pub const ENGINE_IO_VERSION: &str = "4";

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Server address cannot be turned into a WebSocket URL.
    #[error("invalid server address {addr:?}: {reason}")]
    InvalidAddress {
        /// Address as given.
        addr: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Connection task has ended.
    #[error("connection closed")]
    Closed,
}

/// Build the WebSocket endpoint for a server address.
///
/// Accepts `host:port`, `http(s)://` and `ws(s)://` forms. HTTP schemes map
/// to their WebSocket counterparts.
///
/// # Errors
///
/// Returns [`TransportError::InvalidAddress`] if the address does not parse
/// or uses another scheme.
pub fn endpoint_url(server_addr: &str) -> Result<Url, TransportError> {
    let invalid = |reason: String| TransportError::InvalidAddress { addr: server_addr.to_owned(), reason };

    let trimmed = server_addr.trim();
    let with_scheme =
        if trimmed.contains("://") { trimmed.to_owned() } else { format!("http://{trimmed}") };
    let mut url = Url::parse(&with_scheme).map_err(|e| invalid(e.to_string()))?;

    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(invalid(format!("unsupported scheme {other:?}"))),
    };
    url.set_scheme(scheme).map_err(|()| invalid("cannot set scheme".to_owned()))?;
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host".to_owned()));
    }

    url.set_path(SOCKET_IO_PATH);
    url.query_pairs_mut()
        .clear()
        .append_pair("EIO", ENGINE_IO_VERSION)
        .append_pair("transport", "websocket");
    Ok(url)
}

enum Outbound {
    Intent(OutboundIntent),
    Disconnect,
}

/// Handle to a chat server connection.
///
/// Intents are sent and events received via channels, and an internal task
/// handles the WebSocket I/O.
pub struct SocketClient {
    to_server: mpsc::UnboundedSender<Outbound>,
    from_server: mpsc::Receiver<TransportEvent>,
    handle: JoinHandle<()>,
}

impl SocketClient {
    /// Start connecting to `server_addr` and return immediately.
    ///
    /// Every failure, including an unusable address, arrives from
    /// [`recv`](Self::recv) as a connect error event. Must be called from
    /// within a Tokio runtime.
    pub fn connect(server_addr: &str) -> Self {
        let (to_server_tx, to_server_rx) = mpsc::unbounded_channel();
        let (from_server_tx, from_server_rx) = mpsc::channel(64);

        let handle = tokio::spawn(run_connection(server_addr.to_owned(), to_server_rx, from_server_tx));

        Self { to_server: to_server_tx, from_server: from_server_rx, handle }
    }

    /// Queue an intent. Dropped by the session if the handshake has not
    /// completed.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Closed`] if the connection task has ended.
    pub fn send(&self, intent: OutboundIntent) -> Result<(), TransportError> {
        self.to_server.send(Outbound::Intent(intent)).map_err(|_| TransportError::Closed)
    }

    /// Receive the next event. `None` once the connection task has ended.
    pub async fn recv(&mut self) -> Option<TransportEvent> {
        self.from_server.recv().await
    }

    /// Ask the connection task to say goodbye and close the socket.
    pub fn disconnect(&self) {
        if self.to_server.send(Outbound::Disconnect).is_err() {
            tracing::trace!("disconnect after connection ended");
        }
    }

    /// Stop the connection immediately.
    pub fn stop(&self) {
        self.handle.abort();
    }

    /// Wait up to `grace` for the connection task to finish, then stop it.
    pub async fn finish(self, grace: Duration) {
        let Self { to_server, from_server, mut handle } = self;
        drop(to_server);
        drop(from_server);

        if tokio::time::timeout(grace, &mut handle).await.is_err() {
            tracing::debug!("connection task did not finish in time");
            handle.abort();
        }
    }
}

/// Run the connection, bridging between channels and the WebSocket.
async fn run_connection(
    server_addr: String,
    mut to_server: mpsc::UnboundedReceiver<Outbound>,
    from_server: mpsc::Sender<TransportEvent>,
) {
    let mut session = EngineSession::new();

    let url = match endpoint_url(&server_addr) {
        Ok(url) => url,
        Err(e) => {
            report_closed(&mut session, &from_server, &e.to_string()).await;
            return;
        },
    };

    tracing::debug!(%url, "connecting");
    install_crypto_provider();
    let (socket, _response) = match tokio_tungstenite::connect_async(url.as_str()).await {
        Ok(pair) => pair,
        Err(e) => {
            tracing::debug!(error = %e, "websocket connect failed");
            report_closed(&mut session, &from_server, &e.to_string()).await;
            return;
        },
    };
    let (mut sink, mut stream) = socket.split();
    let mut last_heard = Instant::now();

    loop {
        let window = session.heartbeat_window();
        let heartbeat = async move {
            match window {
                Some(window) => tokio::time::sleep_until(last_heard + window).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    last_heard = Instant::now();
                    for output in session.handle_text(&text) {
                        match output {
                            SessionOutput::Send(reply) => {
                                if let Err(e) = sink.send(Message::Text(reply)).await {
                                    report_closed(&mut session, &from_server, &e.to_string()).await;
                                    return;
                                }
                            },
                            SessionOutput::Event(event) => {
                                if from_server.send(event).await.is_err() {
                                    return;
                                }
                            },
                            SessionOutput::Close => {
                                let _ = sink.close().await;
                                return;
                            },
                        }
                    }
                },
                Some(Ok(Message::Close(_))) | None => {
                    report_closed(&mut session, &from_server, "server closed the connection").await;
                    return;
                },
                // Binary frames are unused; control frames are answered by tungstenite.
                Some(Ok(_)) => {},
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "websocket error");
                    report_closed(&mut session, &from_server, &e.to_string()).await;
                    return;
                },
            },
            outbound = to_server.recv() => match outbound {
                Some(Outbound::Intent(intent)) => {
                    if let Some(frame) = session.encode(&intent)
                        && let Err(e) = sink.send(Message::Text(frame)).await
                    {
                        report_closed(&mut session, &from_server, &e.to_string()).await;
                        return;
                    }
                },
                Some(Outbound::Disconnect) | None => {
                    if let Some(frame) = session.disconnect() {
                        let _ = sink.send(Message::Text(frame)).await;
                    }
                    let _ = sink.close().await;
                    return;
                },
            },
            () = heartbeat => {
                tracing::warn!("server heartbeat timed out");
                report_closed(&mut session, &from_server, "server stopped responding").await;
                let _ = sink.close().await;
                return;
            },
        }
    }
}

/// Surface the end of the socket to the application, if it cares.
async fn report_closed(session: &mut EngineSession, from_server: &mpsc::Sender<TransportEvent>, reason: &str) {
    if let Some(event) = session.transport_closed(reason)
        && from_server.send(event).await.is_err()
    {
        tracing::trace!("event receiver dropped");
    }
}

/// `wss://` needs a process-wide rustls provider.
fn install_crypto_provider() {
    // Already installed on every call after the first.
    let _ = rustls::crypto::ring::default_provider().install_default();
}
