//! Slash command parsing.

/// Lines starting with this character are commands.
pub const COMMAND_PREFIX: char = '/';

/// Static help listing: a heading plus one line per command.
pub const HELP_LISTING: [&str; 5] = [
    "Available commands:",
    "  /help    - Show this help message",
    "  /users   - Show online users",
    "  /clear   - Clear the screen",
    "  /quit    - Exit the chat (also /exit)",
];

/// A command from the dispatch table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/help`
    Help,
    /// `/quit` or `/exit`
    Quit,
    /// `/users`
    Users,
    /// `/clear`
    Clear,
    /// Anything else.
    Unknown {
        /// The lowercased token as typed.
        token: String,
    },
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Which command the first token selects.
    pub command: Command,
    /// Remaining whitespace-separated tokens. No command takes arguments yet.
    pub args: Vec<String>,
}

impl CommandLine {
    /// Parse a trimmed line that starts with [`COMMAND_PREFIX`].
    ///
    /// The first token is matched case-insensitively. Parsing is total: every
    /// input maps to exactly one [`Command`].
    pub fn parse(input: &str) -> Self {
        let mut tokens = input.split_whitespace();
        let token = tokens.next().unwrap_or_default().to_lowercase();
        let args = tokens.map(str::to_owned).collect();

        let command = match token.as_str() {
            "/help" => Command::Help,
            "/quit" | "/exit" => Command::Quit,
            "/users" => Command::Users,
            "/clear" => Command::Clear,
            _ => Command::Unknown { token },
        };

        Self { command, args }
    }
}
