//! Terminal driver for the chat client.
//!
//! Implements the [`Driver`] trait over line-buffered stdin, the process
//! interrupt signal, a [`SocketClient`] and a [`Console`]. Uses
//! `tokio::select!` to wait on all three event sources at once, with the
//! interrupt checked first.

use std::{
    io::{self, Stdout, Write},
    time::Duration,
};

use rendezvous_app::{AppEvent, ConsoleLine, Driver};
use rendezvous_client::{TransportEvent, transport::SocketClient};
use rendezvous_proto::OutboundIntent;
use thiserror::Error;
use tokio::{
    io::{AsyncBufRead, Lines},
    sync::mpsc,
};

use crate::{console::Console, notify::Notifier};

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// `R` is the line source (stdin in production) and `W` the console output.
pub struct TerminalDriver<R, W: Write = Stdout> {
    console: Console<W>,
    input: Lines<R>,
    input_open: bool,
    /// Whether typed lines are echoed by the terminal and should be erased.
    echoes_input: bool,
    interrupts: mpsc::UnboundedReceiver<()>,
    notifier: Box<dyn Notifier>,
    connection: Option<SocketClient>,
}

impl<R, W> TerminalDriver<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    /// Create a driver. Nothing connects until the runtime asks.
    pub fn new(
        console: Console<W>,
        input: Lines<R>,
        echoes_input: bool,
        interrupts: mpsc::UnboundedReceiver<()>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self { console, input, input_open: true, echoes_input, interrupts, notifier, connection: None }
    }

    /// Give the connection `grace` to close cleanly, then drop it.
    pub async fn shutdown(&mut self, grace: Duration) {
        if let Some(connection) = self.connection.take() {
            connection.finish(grace).await;
        }
    }

    /// Console the driver writes to.
    pub fn console(&self) -> &Console<W> {
        &self.console
    }
}

fn app_event(event: TransportEvent) -> AppEvent {
    match event {
        TransportEvent::Connected => AppEvent::Connected,
        TransportEvent::Disconnected => AppEvent::Disconnected,
        TransportEvent::Inbound(event) => AppEvent::Inbound(event),
    }
}

async fn next_transport_event(connection: &mut Option<SocketClient>) -> Option<TransportEvent> {
    match connection {
        Some(connection) => connection.recv().await,
        None => std::future::pending().await,
    }
}

impl<R, W> Driver for TerminalDriver<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    type Error = TerminalError;

    fn connect(&mut self, server_addr: &str) -> Result<(), Self::Error> {
        if let Some(previous) = self.connection.take() {
            previous.stop();
        }
        tracing::info!(server = server_addr, "connecting");
        self.connection = Some(SocketClient::connect(server_addr));
        Ok(())
    }

    async fn next_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        loop {
            let transport_open = self.connection.is_some();
            if !self.input_open && !transport_open {
                return Ok(None);
            }

            tokio::select! {
                biased;

                Some(()) = self.interrupts.recv() => return Ok(Some(AppEvent::Interrupt)),
                line = self.input.next_line(), if self.input_open => match line? {
                    Some(line) => return Ok(Some(AppEvent::Line(line))),
                    None => {
                        tracing::debug!("input closed");
                        self.input_open = false;
                    },
                },
                event = next_transport_event(&mut self.connection), if transport_open => match event {
                    Some(event) => return Ok(Some(app_event(event))),
                    None => {
                        tracing::debug!("connection task ended");
                        self.connection = None;
                    },
                },
            }
        }
    }

    fn emit(&mut self, intent: OutboundIntent) -> Result<(), Self::Error> {
        match &self.connection {
            Some(connection) => {
                if let Err(e) = connection.send(intent) {
                    tracing::debug!(error = %e, "dropping outbound event");
                }
            },
            None => tracing::debug!(event = intent.event_name(), "no connection for outbound event"),
        }
        Ok(())
    }

    fn render(&mut self, line: &ConsoleLine) -> Result<(), Self::Error> {
        Ok(self.console.write_line(line)?)
    }

    fn erase_input_line(&mut self) -> Result<(), Self::Error> {
        if self.echoes_input {
            self.console.erase_previous_line()?;
        }
        Ok(())
    }

    fn clear_screen(&mut self) -> Result<(), Self::Error> {
        Ok(self.console.clear_screen()?)
    }

    fn notify(&mut self) {
        self.notifier.notify();
    }

    fn disconnect(&mut self) {
        if let Some(connection) = &self.connection {
            connection.disconnect();
        }
    }
}

#[cfg(test)]
mod tests {
    use rendezvous_app::Tone;
    use tokio::io::AsyncBufReadExt;

    use super::*;
    use crate::notify::Silent;

    fn driver(input: &'static [u8]) -> (TerminalDriver<&'static [u8], Vec<u8>>, mpsc::UnboundedSender<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let driver = TerminalDriver::new(Console::new(Vec::new(), false), input.lines(), false, rx, Box::new(Silent));
        (driver, tx)
    }

    fn output(driver: &TerminalDriver<&'static [u8], Vec<u8>>) -> String {
        String::from_utf8(driver.console().get_ref().clone()).expect("utf-8")
    }

    #[tokio::test]
    async fn lines_arrive_in_order_then_input_ends() {
        let (mut driver, _tx) = driver(b"hello\n\n/quit\n");

        assert_eq!(driver.next_event().await.expect("read"), Some(AppEvent::Line("hello".into())));
        assert_eq!(driver.next_event().await.expect("read"), Some(AppEvent::Line(String::new())));
        assert_eq!(driver.next_event().await.expect("read"), Some(AppEvent::Line("/quit".into())));
        assert_eq!(driver.next_event().await.expect("read"), None);
    }

    #[tokio::test]
    async fn interrupt_is_an_event() {
        let (mut driver, tx) = driver(b"");
        tx.send(()).expect("receiver alive");

        assert_eq!(driver.next_event().await.expect("read"), Some(AppEvent::Interrupt));
    }

    #[tokio::test]
    async fn interrupt_beats_a_ready_line() {
        let (mut driver, tx) = driver(b"hello\n");
        tx.send(()).expect("receiver alive");

        assert_eq!(driver.next_event().await.expect("read"), Some(AppEvent::Interrupt));
        assert_eq!(driver.next_event().await.expect("read"), Some(AppEvent::Line("hello".into())));
    }

    #[tokio::test]
    async fn render_writes_decorated_line() {
        let (mut driver, _tx) = driver(b"");
        driver.render(&ConsoleLine::new(Tone::Connected, "Connected to server!")).expect("write");
        driver.erase_input_line().expect("write");

        assert_eq!(output(&driver), "✓ Connected to server!\n");
    }

    #[tokio::test]
    async fn emit_without_connection_is_dropped() {
        let (mut driver, _tx) = driver(b"");
        driver.emit(OutboundIntent::RequestUsersList).expect("never fails");
        driver.disconnect();
        driver.shutdown(Duration::from_millis(10)).await;
    }
}
