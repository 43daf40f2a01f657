//! Headless terminal that records everything painted on it.
//!
//! Clones share state, so a test can hand one clone to the engine and keep
//! another to inspect what was written. Written bytes are also fed through
//! a `vt100` parser, which gives the screen a real terminal would show.

use super::{ensure_nonzero, Terminal};
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One call made on a [`MemoryTerminal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    /// Cursor moved to `(row, col)`.
    MoveCursor {
        /// Row (0-indexed).
        row: u16,
        /// Column (0-indexed).
        col: u16,
    },
    /// Text written at the cursor.
    Write(String),
    /// Output flushed.
    Flush,
}

struct Inner {
    width: u16,
    height: u16,
    events: Vec<TerminalEvent>,
    parser: vt100::Parser,
    failing_sizes: u32,
    failing_writes: u32,
}

/// An in-memory [`Terminal`].
#[derive(Clone)]
pub struct MemoryTerminal {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryTerminal {
    /// Create a `width`×`height` terminal.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                width,
                height,
                events: Vec::new(),
                parser: vt100::Parser::new(height.max(1), width.max(1), 0),
                failing_sizes: 0,
                failing_writes: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Simulate the user resizing the window.
    pub fn set_size(&self, width: u16, height: u16) {
        let mut inner = self.lock();
        inner.width = width;
        inner.height = height;
        inner.parser.set_size(height.max(1), width.max(1));
    }

    /// Make the next `count` size queries fail.
    pub fn fail_next_sizes(&self, count: u32) {
        self.lock().failing_sizes = count;
    }

    /// Make the next `count` cursor moves, writes or flushes fail.
    pub fn fail_next_writes(&self, count: u32) {
        self.lock().failing_writes = count;
    }

    /// Every call recorded so far.
    pub fn events(&self) -> Vec<TerminalEvent> {
        self.lock().events.clone()
    }

    /// Forget recorded calls. The emulated screen is kept.
    pub fn clear_events(&self) {
        self.lock().events.clear();
    }

    /// Number of flushes, which is one per repaint.
    pub fn flush_count(&self) -> usize {
        self.lock()
            .events
            .iter()
            .filter(|e| matches!(e, TerminalEvent::Flush))
            .count()
    }

    /// Concatenation of every `Write` event.
    pub fn written(&self) -> String {
        self.lock()
            .events
            .iter()
            .filter_map(|e| match e {
                TerminalEvent::Write(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The visible screen, one string per row with trailing blanks trimmed.
    pub fn screen_rows(&self) -> Vec<String> {
        let inner = self.lock();
        let (_, cols) = inner.parser.screen().size();
        inner
            .parser
            .screen()
            .rows(0, cols)
            .map(|row| row.trim_end().to_string())
            .collect()
    }

    /// Where the emulated cursor is, as `(row, col)`.
    pub fn cursor_position(&self) -> (u16, u16) {
        self.lock().parser.screen().cursor_position()
    }

    fn record(&self, event: TerminalEvent, bytes: &[u8]) -> io::Result<()> {
        let mut inner = self.lock();
        if inner.failing_writes > 0 {
            inner.failing_writes -= 1;
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "injected write failure"));
        }
        inner.parser.process(bytes);
        inner.events.push(event);
        Ok(())
    }
}

impl Terminal for MemoryTerminal {
    fn size(&mut self) -> io::Result<(u16, u16)> {
        let mut inner = self.lock();
        if inner.failing_sizes > 0 {
            inner.failing_sizes -= 1;
            return Err(io::Error::other("injected size failure"));
        }
        ensure_nonzero(inner.width, inner.height)
    }

    fn move_cursor(&mut self, row: u16, col: u16) -> io::Result<()> {
        let seq = format!("\x1b[{};{}H", u32::from(row) + 1, u32::from(col) + 1);
        self.record(TerminalEvent::MoveCursor { row, col }, seq.as_bytes())
    }

    fn write_raw(&mut self, text: &str) -> io::Result<()> {
        self.record(TerminalEvent::Write(text.to_string()), text.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.record(TerminalEvent::Flush, &[])
    }
}

impl std::fmt::Debug for MemoryTerminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("MemoryTerminal")
            .field("width", &inner.width)
            .field("height", &inner.height)
            .field("events", &inner.events.len())
            .finish()
    }
}
