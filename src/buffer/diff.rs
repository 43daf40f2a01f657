//! Diffing Engine: Decide whether the screen needs a repaint, and paint it.
//!
//! This module implements the core anti-flicker logic:
//! 1. Compare the content grid against the snapshot of what was last painted
//! 2. If they are equal, emit nothing at all (no cursor movement either)
//! 3. Otherwise repaint every row, top to bottom, and flush once
//!
//! Cell content is opaque and may carry its own escape sequences, so the
//! unit of change is the whole screen rather than a run of cells.

use super::Grid;
use crate::terminal::Terminal;
use std::io;

/// Erase from the cursor to the end of the line.
const ERASE_LINE: &str = "\x1b[K";
/// Hide the cursor while a frame is being written.
const CURSOR_HIDE: &str = "\x1b[?25l";
/// Show it again afterwards.
const CURSOR_SHOW: &str = "\x1b[?25h";

/// Result of a repaint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaintResult {
    /// Rows written.
    pub rows: u16,
    /// Bytes handed to the terminal, escape sequences included.
    pub bytes: usize,
}

/// Whether `snapshot` still shows exactly what `content` holds.
///
/// Grids of different shapes are never equal.
#[inline]
pub fn needs_repaint(content: &Grid, snapshot: &Grid) -> bool {
    content != snapshot
}

/// Write the whole grid to `terminal`.
///
/// The cursor is homed, each row is written left to right and erased to
/// the end of the line, and rows are separated by `\r\n`. No line break
/// follows the last row, so a full-height grid never scrolls the terminal.
/// With `park_below` set the cursor finishes on the row after the grid.
///
/// # Errors
///
/// Returns the first error reported by the terminal. Nothing is flushed
/// after a failure.
pub fn render_full<T: Terminal + ?Sized>(
    grid: &Grid,
    terminal: &mut T,
    park_below: bool,
) -> io::Result<PaintResult> {
    let mut result = PaintResult::default();
    let mut line = String::with_capacity(usize::from(grid.width()) + ERASE_LINE.len() + 2);

    terminal.write_raw(CURSOR_HIDE)?;
    terminal.move_cursor(0, 0)?;
    result.bytes += CURSOR_HIDE.len() + cursor_move_len(0, 0);

    for (y, row) in grid.rows().take(usize::from(grid.height())).enumerate() {
        line.clear();
        if y > 0 {
            line.push_str("\r\n");
        }
        for cell in row {
            line.push_str(cell);
        }
        line.push_str(ERASE_LINE);
        terminal.write_raw(&line)?;
        result.bytes += line.len();
        result.rows += 1;
    }

    if park_below {
        terminal.move_cursor(grid.height(), 0)?;
        result.bytes += cursor_move_len(grid.height(), 0);
    }
    terminal.write_raw(CURSOR_SHOW)?;
    result.bytes += CURSOR_SHOW.len();
    terminal.flush()?;

    Ok(result)
}

/// Length of `ESC[{row+1};{col+1}H`.
fn cursor_move_len(row: u16, col: u16) -> usize {
    fn digits(n: u32) -> usize {
        n.to_string().len()
    }
    4 + digits(u32::from(row) + 1) + digits(u32::from(col) + 1)
}
