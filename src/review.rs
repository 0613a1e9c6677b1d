//! Pausing between files for manual review.

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::Result;

/// Prompt shown after each file.
pub const CONTINUE_PROMPT: &str = "Press Enter to continue...";

/// ANSI sequence that clears the screen and homes the cursor.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Hook run after each displayed file.
pub trait Reviewer {
    /// Block until the user is ready for the next file.
    fn pause(&mut self, out: &mut dyn Write) -> Result<()>;
}

/// Waits for a line on stdin, then clears the terminal.
pub struct StdinReviewer<R> {
    input: R,
    clear: bool,
}

impl StdinReviewer<io::StdinLock<'static>> {
    pub fn new() -> Self {
        StdinReviewer {
            input: io::stdin().lock(),
            clear: io::stdout().is_terminal(),
        }
    }
}

impl Default for StdinReviewer<io::StdinLock<'static>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: BufRead> StdinReviewer<R> {
    pub fn with_input(input: R, clear: bool) -> Self {
        StdinReviewer { input, clear }
    }
}

impl<R: BufRead> Reviewer for StdinReviewer<R> {
    fn pause(&mut self, out: &mut dyn Write) -> Result<()> {
        write!(out, "{CONTINUE_PROMPT}")?;
        out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            // EOF: nobody left to press Enter.
            writeln!(out)?;
            tracing::debug!("stdin closed, not waiting for review");
        }

        if self.clear {
            write!(out, "{CLEAR_SCREEN}")?;
            out.flush()?;
        }
        Ok(())
    }
}

/// Never blocks. Used for `--no-pause` and JSON output.
#[derive(Debug, Default)]
pub struct NoPause;

impl Reviewer for NoPause {
    fn pause(&mut self, _out: &mut dyn Write) -> Result<()> {
        Ok(())
    }
}
