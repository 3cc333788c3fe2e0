//! Rendezvous chat client entry point.

use std::{
    io::{IsTerminal, stdin, stdout},
    time::Duration,
};

use clap::Parser;
use rendezvous_app::{
    App, ConsoleLine, ExitStatus, FAREWELL, Runtime, Session, SystemClock, Tone, welcome_banner,
};
use rendezvous_cli::{
    Console, TerminalDriver, TerminalError,
    console::USERNAME_PROMPT,
    notify,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// How long the connection gets to say goodbye on exit.
const CLOSE_GRACE: Duration = Duration::from_millis(500);

/// Rendezvous terminal chat client
#[derive(Parser, Debug)]
#[command(name = "rendezvous")]
#[command(about = "Terminal client for a Socket.IO chat server")]
#[command(version)]
struct Args {
    /// Chat server address (host:port, http(s):// or ws(s)://)
    #[arg(short, long, env = "RENDEZVOUS_SERVER", default_value = "http://localhost:3000")]
    server: String,

    /// Username to chat as; skips the prompt
    #[arg(short, long)]
    username: Option<String>,

    /// Never play a sound for incoming messages
    #[arg(long)]
    no_sound: bool,

    /// Command run for the incoming message sound
    #[arg(long, conflicts_with = "no_sound")]
    sound_command: Option<String>,

    /// Disable colored output (also honors NO_COLOR)
    #[arg(long)]
    no_color: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    fn color(&self) -> bool {
        !self.no_color && std::env::var_os("NO_COLOR").is_none() && stdout().is_terminal()
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

    let status = exit_status(run(args).await);

    // Blocking stdin reads would keep the runtime from shutting down.
    std::process::exit(status.code());
}

fn exit_status(result: Result<ExitStatus, TerminalError>) -> ExitStatus {
    result.unwrap_or_else(|e| {
        tracing::error!(error = %e, "terminal failure");
        ExitStatus::Failure
    })
}

async fn run(args: Args) -> Result<ExitStatus, TerminalError> {
    let mut console = Console::stdout(args.color());
    for line in welcome_banner() {
        console.write_line(&line)?;
    }

    let mut interrupts = listen_for_interrupts();
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    let answer = match &args.username {
        Some(name) => name.clone(),
        None => {
            console.prompt(USERNAME_PROMPT)?;
            tokio::select! {
                biased;

                Some(()) = interrupts.recv() => {
                    console.write_line(&ConsoleLine::new(Tone::Farewell, FAREWELL))?;
                    return Ok(ExitStatus::Success);
                },
                line = input.next_line() => line?.unwrap_or_default(),
            }
        },
    };

    let session = Session::new(&answer, &mut rand::rng());
    tracing::info!(username = session.username(), server = %args.server, "starting session");

    let notifier = notify::select(args.no_sound, args.sound_command.as_deref());
    let driver = TerminalDriver::new(console, input, stdin().is_terminal(), interrupts, notifier);
    let app = App::new(session, args.server, SystemClock);

    let mut runtime = Runtime::new(driver, app);
    let status = runtime.run().await?;
    runtime.driver_mut().shutdown(CLOSE_GRACE).await;

    Ok(status)
}

/// Forward every Ctrl+C to a channel.
fn listen_for_interrupts() -> mpsc::UnboundedReceiver<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "cannot listen for interrupts");
                return;
            }
            if tx.send(()).is_err() {
                return;
            }
        }
    });
    rx
}
