//! Line-oriented console output.
//!
//! Maps each [`Tone`] to a prefix and a crossterm style, and writes whole
//! lines to any [`Write`]. Color is optional so output can be piped or
//! snapshot tested.

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor::{MoveTo, MoveToColumn, MoveUp},
    queue,
    style::{Attribute, Color, ContentStyle, PrintStyledContent, Stylize},
    terminal::{Clear, ClearType},
};
use rendezvous_app::{ConsoleLine, Tone};

/// Username prompt shown before connecting.
pub const USERNAME_PROMPT: &str = "Enter your username: ";

/// Prefix placed before a line of the given tone.
pub fn prefix(tone: Tone) -> &'static str {
    match tone {
        Tone::Banner => "💬 ",
        Tone::Connected => "✓ ",
        Tone::Disconnected => "✗ ",
        Tone::Announcement => "📢 ",
        Tone::Joined | Tone::Left | Tone::Farewell => "👋 ",
        Tone::Roster => "👥 ",
        Tone::Heading => "📋 ",
        Tone::Muted
        | Tone::Incoming
        | Tone::Outgoing
        | Tone::Typing
        | Tone::Help
        | Tone::Error => "",
    }
}

/// Terminal style for a tone.
pub fn style(tone: Tone) -> ContentStyle {
    let color = match tone {
        Tone::Banner => Color::Magenta,
        Tone::Muted | Tone::Typing | Tone::Help => Color::DarkGrey,
        Tone::Connected | Tone::Joined => Color::Green,
        Tone::Disconnected | Tone::Left | Tone::Error => Color::Red,
        Tone::Announcement | Tone::Farewell => Color::Yellow,
        Tone::Incoming => Color::White,
        Tone::Outgoing => Color::Blue,
        Tone::Roster | Tone::Heading => Color::Cyan,
    };

    let mut style = ContentStyle::new();
    style.foreground_color = Some(color);
    if tone == Tone::Banner {
        style.attributes.set(Attribute::Bold);
    }
    style
}

/// Unstyled rendering of a line, prefix included.
pub fn decorate(line: &ConsoleLine) -> String {
    format!("{}{}", prefix(line.tone), line.text)
}

/// Whether a blank line separates this tone from what came before.
fn spaced(tone: Tone) -> bool {
    matches!(tone, Tone::Heading | Tone::Roster)
}

/// Console writer.
#[derive(Debug)]
pub struct Console<W: Write> {
    out: W,
    color: bool,
}

impl Console<Stdout> {
    /// Console on standard output.
    pub fn stdout(color: bool) -> Self {
        Self::new(io::stdout(), color)
    }
}

impl<W: Write> Console<W> {
    /// Console writing to `out`.
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    /// Write one line and flush.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn write_line(&mut self, line: &ConsoleLine) -> io::Result<()> {
        if spaced(line.tone) {
            writeln!(self.out)?;
        }

        let text = decorate(line);
        if self.color {
            queue!(self.out, PrintStyledContent(style(line.tone).apply(text)))?;
        } else {
            self.out.write_all(text.as_bytes())?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }

    /// Write a prompt without a line break.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn prompt(&mut self, text: &str) -> io::Result<()> {
        if self.color {
            queue!(self.out, PrintStyledContent(text.cyan()))?;
        } else {
            self.out.write_all(text.as_bytes())?;
        }
        self.out.flush()
    }

    /// Overwrite the previous line, where the terminal echoed the input.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn erase_previous_line(&mut self) -> io::Result<()> {
        queue!(self.out, MoveUp(1), MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        self.out.flush()
    }

    /// Clear the screen and home the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn clear_screen(&mut self) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        self.out.flush()
    }

    /// The underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.out
    }
}
