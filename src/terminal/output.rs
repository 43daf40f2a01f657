//! `OutputBuffer`: Single-syscall output buffer for ANSI sequences.

use std::io::Write;

/// Pre-allocated buffer for building a repaint.
///
/// A whole frame is accumulated here, then flushed in a single `write()`
/// syscall so the terminal never shows half a repaint.
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Check if buffer is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write a string.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
    }

    /// Move cursor to `(row, col)`, both 0-indexed.
    #[inline]
    pub fn cursor_move(&mut self, row: u16, col: u16) {
        // CSI row ; col H
        let _ = write!(self.data, "\x1b[{};{}H", u32::from(row) + 1, u32::from(col) + 1);
    }

    /// Flush to a writer in a single syscall, then clear.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails. The buffer is
    /// cleared either way so a failed frame is not replayed.
    pub fn flush_to<W: Write>(&mut self, writer: &mut W) -> std::io::Result<()> {
        let result = writer.write_all(&self.data).and_then(|()| writer.flush());
        self.data.clear();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_move_is_one_indexed() {
        let mut out = OutputBuffer::with_capacity(16);
        out.cursor_move(0, 0);
        out.cursor_move(5, 10);
        let mut sink = Vec::new();
        out.flush_to(&mut sink).unwrap();
        assert_eq!(sink, b"\x1b[1;1H\x1b[6;11H");
    }

    #[test]
    fn test_flush_to_clears() {
        let mut out = OutputBuffer::with_capacity(16);
        assert!(out.is_empty());
        out.write_str("abc");
        assert!(!out.is_empty());
        let mut sink = Vec::new();
        out.flush_to(&mut sink).unwrap();
        assert_eq!(sink, b"abc");
        assert!(out.is_empty());

        // A second flush writes nothing new.
        out.flush_to(&mut sink).unwrap();
        assert_eq!(sink, b"abc");
    }
}
