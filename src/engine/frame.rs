//! Frame: The content grid, the painted snapshot, and one render tick.
//!
//! A `Frame` lives behind the engine's mutex. Edits and ticks both take
//! that lock, so a tick always reshapes, compares, paints and snapshots a
//! single consistent state of the grid.

use super::config::RenderConfig;
use crate::buffer::diff::{needs_repaint, render_full};
use crate::buffer::Grid;
use crate::terminal::Terminal;
use log::{debug, warn};
use std::io;
use std::thread;
use std::time::Instant;

/// Render statistics for debugging/profiling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Ticks run.
    pub ticks: u64,
    /// Ticks that repainted the screen.
    pub repaints: u64,
    /// Terminal size changes observed.
    pub resizes: u64,
    /// Total bytes written to the terminal.
    pub bytes_written: u64,
    /// Smoothed repaint time in microseconds.
    pub avg_repaint_us: u64,
    /// Last repaint time in microseconds.
    pub last_repaint_us: u64,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// The terminal size changed and both grids were reshaped.
    pub resized: bool,
    /// The screen was repainted.
    pub repainted: bool,
}

/// Content and snapshot grids.
#[derive(Debug, Clone)]
pub struct Frame {
    /// What should be on screen.
    content: Grid,
    /// What was last written to the terminal.
    snapshot: Grid,
    /// Counters.
    stats: RenderStats,
}

impl Frame {
    /// Create a frame with both grids empty.
    ///
    /// The snapshot starts out matching the empty content, so nothing is
    /// painted until something is edited.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            content: Grid::new(width, height),
            snapshot: Grid::new(width, height),
            stats: RenderStats::default(),
        }
    }

    /// The content grid.
    #[inline]
    pub const fn content(&self) -> &Grid {
        &self.content
    }

    /// The content grid, for edits.
    #[inline]
    pub fn content_mut(&mut self) -> &mut Grid {
        &mut self.content
    }

    /// The last painted grid.
    #[inline]
    pub const fn snapshot(&self) -> &Grid {
        &self.snapshot
    }

    /// Counters so far.
    #[inline]
    pub const fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Reshape both grids to `(width, height)`.
    ///
    /// Content keeps every cell that exists in both shapes. The snapshot is
    /// reallocated empty. Returns `false` if the shape was already right.
    pub fn reshape(&mut self, width: u16, height: u16) -> bool {
        if self.content.dimensions() == (width, height) {
            return false;
        }
        debug!(
            "reshaping {}x{} -> {width}x{height}",
            self.content.width(),
            self.content.height()
        );
        self.content.resize(width, height);
        self.snapshot = Grid::new(width, height);
        self.stats.resizes += 1;
        true
    }

    /// Run one tick against `terminal`.
    ///
    /// Queries the size, reshapes on change, and repaints only if the
    /// content differs from the snapshot or the grids were just reshaped.
    /// When nothing changed, the terminal is not touched beyond the size query.
    ///
    /// # Errors
    ///
    /// Returns the terminal error once `config.io_retries` retries of the
    /// size query or the repaint have all failed.
    pub fn tick<T: Terminal + ?Sized>(
        &mut self,
        terminal: &mut T,
        config: &RenderConfig,
    ) -> io::Result<TickOutcome> {
        self.stats.ticks += 1;

        let (width, height) = retry(config, "size query", || terminal.size())?;
        let resized = self.reshape(width, height);

        if !resized && !needs_repaint(&self.content, &self.snapshot) {
            return Ok(TickOutcome { resized, repainted: false });
        }

        let start = Instant::now();
        let painted = retry(config, "repaint", || {
            render_full(&self.content, &mut *terminal, config.cursor_below)
        })?;
        self.snapshot.copy_from(&self.content);

        let elapsed_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
        self.stats.repaints += 1;
        self.stats.bytes_written += painted.bytes as u64;
        self.stats.last_repaint_us = elapsed_us;
        self.stats.avg_repaint_us = if self.stats.avg_repaint_us == 0 {
            elapsed_us
        } else {
            (self.stats.avg_repaint_us * 15 + elapsed_us) / 16
        };
        debug!("repainted {} rows, {} bytes", painted.rows, painted.bytes);

        Ok(TickOutcome { resized, repainted: true })
    }
}

/// Run `op`, retrying up to `config.io_retries` times.
fn retry<R>(
    config: &RenderConfig,
    what: &str,
    mut op: impl FnMut() -> io::Result<R>,
) -> io::Result<R> {
    let mut attempt = 0;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) if attempt < config.io_retries => {
                attempt += 1;
                warn!("{what} failed ({e}), retry {attempt}/{}", config.io_retries);
                if !config.retry_backoff.is_zero() {
                    thread::sleep(config.retry_backoff);
                }
            }
            Err(e) => return Err(e),
        }
    }
}
