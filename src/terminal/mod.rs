//! Terminal module: The output side of the renderer.
//!
//! The render engine never talks to stdout directly. It drives a
//! [`Terminal`], which knows three things: how big the screen is, how to
//! move the cursor, and how to write text. Two backends are provided:
//!
//! - [`CrosstermTerminal`]: the process's real terminal
//! - [`MemoryTerminal`]: a headless recorder for tests and tooling

mod backend;
mod memory;
mod output;

pub use backend::CrosstermTerminal;
pub use memory::{MemoryTerminal, TerminalEvent};

use std::io;

/// A terminal the render engine can paint on.
///
/// Implementations may buffer `move_cursor` and `write_raw`; nothing is
/// required to be visible until [`flush`](Terminal::flush) returns.
pub trait Terminal {
    /// Current size as `(width, height)`.
    ///
    /// # Errors
    ///
    /// Fails if the size cannot be read. A zero-sized answer must be
    /// reported as an error rather than returned.
    fn size(&mut self) -> io::Result<(u16, u16)>;

    /// Move the cursor to `(row, col)`, both 0-indexed.
    fn move_cursor(&mut self, row: u16, col: u16) -> io::Result<()>;

    /// Write text at the cursor.
    fn write_raw(&mut self, text: &str) -> io::Result<()>;

    /// Push everything written so far to the screen.
    fn flush(&mut self) -> io::Result<()>;
}

impl<T: Terminal + ?Sized> Terminal for Box<T> {
    fn size(&mut self) -> io::Result<(u16, u16)> {
        (**self).size()
    }

    fn move_cursor(&mut self, row: u16, col: u16) -> io::Result<()> {
        (**self).move_cursor(row, col)
    }

    fn write_raw(&mut self, text: &str) -> io::Result<()> {
        (**self).write_raw(text)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Read the live size of the process's terminal as `(width, height)`.
///
/// # Errors
///
/// Fails when there is no terminal to ask, or when it reports a zero axis.
pub fn dimensions() -> io::Result<(u16, u16)> {
    let (width, height) = crossterm::terminal::size()?;
    ensure_nonzero(width, height)
}

pub(crate) fn ensure_nonzero(width: u16, height: u16) -> io::Result<(u16, u16)> {
    if width == 0 || height == 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("terminal reported a {width}x{height} screen"),
        ));
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_nonzero() {
        assert_eq!(ensure_nonzero(80, 24).unwrap(), (80, 24));
        assert!(ensure_nonzero(0, 24).is_err());
        assert!(ensure_nonzero(80, 0).is_err());
    }

    #[test]
    fn test_boxed_terminal_forwards() {
        let memory = MemoryTerminal::new(4, 2);
        let mut boxed: Box<dyn Terminal> = Box::new(memory.clone());
        assert_eq!(boxed.size().unwrap(), (4, 2));
        boxed.write_raw("x").unwrap();
        assert_eq!(memory.events(), vec![TerminalEvent::Write("x".to_string())]);
    }
}
