//! Crossterm-backed terminal for the process's stdout.

use super::output::OutputBuffer;
use super::{dimensions, Terminal};
use std::io::{self, Stdout};

/// The real terminal.
///
/// Cursor moves and text are staged in an output buffer and reach stdout
/// in one `write_all` on [`flush`](Terminal::flush).
pub struct CrosstermTerminal {
    /// Staged frame bytes.
    output: OutputBuffer,
    /// Terminal stdout handle.
    stdout: Stdout,
}

impl CrosstermTerminal {
    /// Create a backend writing to stdout.
    pub fn new() -> Self {
        Self {
            output: OutputBuffer::with_capacity(65536),
            stdout: io::stdout(),
        }
    }
}

impl Default for CrosstermTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for CrosstermTerminal {
    fn size(&mut self) -> io::Result<(u16, u16)> {
        dimensions()
    }

    fn move_cursor(&mut self, row: u16, col: u16) -> io::Result<()> {
        self.output.cursor_move(row, col);
        Ok(())
    }

    fn write_raw(&mut self, text: &str) -> io::Result<()> {
        self.output.write_str(text);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.output.is_empty() {
            return Ok(());
        }
        // Hold the stdout lock so no other thread's output lands mid-frame.
        let mut lock = self.stdout.lock();
        self.output.flush_to(&mut lock)
    }
}
