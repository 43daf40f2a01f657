//! Engine: Public handle to a differential renderer.
//!
//! The engine owns the terminal backend and the frame. `start` moves the
//! backend onto a tick thread; `join` brings it back, so an engine can be
//! started again after it stops.

use super::config::{check_frame_rate, RenderConfig};
use super::frame::{Frame, RenderStats, TickOutcome};
use super::lock_frame;
use super::ticker::{Shared, TickLoop};
use crate::buffer::Grid;
use crate::error::{RenderError, Result};
use crate::terminal::Terminal;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

/// Lifecycle state of an [`Engine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineState {
    /// No tick thread is running.
    Stopped,
    /// The tick thread is alive.
    Running,
}

/// A differential terminal renderer.
///
/// # Example
///
/// ```rust,ignore
/// use tickscreen::{CrosstermTerminal, Engine, RenderConfig};
///
/// let mut engine = Engine::new(CrosstermTerminal::new(), RenderConfig::default())?;
/// engine.start(None)?;
/// engine.edit_cell(0, 0, "status: ok")?;
/// // ...
/// engine.shutdown()?;
/// ```
pub struct Engine<T: Terminal + Send + 'static> {
    /// Configuration captured at construction.
    config: RenderConfig,
    /// The backend, while no tick thread holds it.
    terminal: Option<T>,
    /// Content and snapshot. `None` until the first `open`/`start`.
    frame: Option<Arc<Mutex<Frame>>>,
    /// Cleared to stop the tick loop.
    running: Arc<AtomicBool>,
    /// Ticks per second.
    frame_rate: Arc<AtomicU32>,
    /// The tick thread, if one was started and not yet joined.
    ticker: Option<TickLoop<T>>,
}

impl<T: Terminal + Send + 'static> Engine<T> {
    /// Create a stopped engine.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Config`] if `config` does not validate.
    pub fn new(terminal: T, config: RenderConfig) -> Result<Self> {
        config.validate()?;
        if config.max_retry_stall() > config.frame_interval() {
            warn!(
                "retries can hold edits back for up to {:?} per tick",
                config.max_retry_stall()
            );
        }
        let frame_rate = Arc::new(AtomicU32::new(config.frame_rate));
        Ok(Self {
            config,
            terminal: Some(terminal),
            frame: None,
            running: Arc::new(AtomicBool::new(false)),
            frame_rate,
            ticker: None,
        })
    }

    /// Current lifecycle state.
    ///
    /// After [`stop`](Self::stop) the engine reports `Running` until the
    /// tick thread has actually exited.
    pub fn state(&self) -> EngineState {
        match &self.ticker {
            Some(ticker) if !ticker.is_finished() => EngineState::Running,
            _ => EngineState::Stopped,
        }
    }

    /// Check if the tick thread is alive.
    pub fn is_running(&self) -> bool {
        self.state() == EngineState::Running
    }

    /// Allocate fresh, empty content and snapshot grids without starting
    /// the tick thread.
    ///
    /// With `dimensions` of `None` the terminal is asked for its size. The
    /// engine can then be driven by hand with [`tick`](Self::tick).
    ///
    /// # Errors
    ///
    /// [`RenderError::AlreadyRunning`] while the tick thread is alive, or
    /// [`RenderError::Terminal`] if the size query fails. A tick thread that
    /// ended on an error and was never joined is joined here and its error
    /// returned; nothing is allocated, and a second call goes ahead.
    pub fn open(&mut self, dimensions: Option<(u16, u16)>) -> Result<()> {
        let terminal = self.reclaim_terminal()?;
        let (width, height) = match dimensions {
            Some(dims) => dims,
            None => terminal.size()?,
        };
        debug!("allocating {width}x{height} frame");
        self.frame = Some(Arc::new(Mutex::new(Frame::new(width, height))));
        Ok(())
    }

    /// Allocate the grids and start the tick thread.
    ///
    /// Dimensions are as for [`open`](Self::open). Each start begins from
    /// empty grids.
    ///
    /// # Errors
    ///
    /// [`RenderError::AlreadyRunning`] if the tick thread is alive (call
    /// [`join`](Self::join) after [`stop`](Self::stop) before restarting),
    /// [`RenderError::Terminal`] if the size query fails, or the unjoined
    /// error of a previous loop as for [`open`](Self::open).
    pub fn start(&mut self, dimensions: Option<(u16, u16)>) -> Result<()> {
        self.open(dimensions)?;
        let (Some(terminal), Some(frame)) = (self.terminal.take(), self.frame.clone()) else {
            return Err(RenderError::NotStarted);
        };

        self.running.store(true, Ordering::Release);
        let shared = Shared {
            frame,
            running: Arc::clone(&self.running),
            frame_rate: Arc::clone(&self.frame_rate),
        };
        self.ticker = Some(TickLoop::spawn(terminal, shared, self.config.clone()));
        info!("render engine started at {} fps", self.frame_rate());
        Ok(())
    }

    /// Ask the tick thread to stop.
    ///
    /// Returns immediately. The thread exits within one frame interval;
    /// use [`join`](Self::join) to wait for it.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
        if let Some(ticker) = &self.ticker {
            ticker.wake();
        }
    }

    /// Wait for the tick thread to exit.
    ///
    /// This does not request a stop: it returns once [`stop`](Self::stop)
    /// has been called, or once a terminal failure ended the loop.
    ///
    /// # Errors
    ///
    /// The terminal error that ended the loop, or
    /// [`RenderError::ThreadPanicked`].
    pub fn join(&mut self) -> Result<()> {
        let Some(ticker) = self.ticker.take() else {
            return Ok(());
        };
        let (terminal, result) = ticker.join();
        if terminal.is_some() {
            self.terminal = terminal;
        }
        info!("render engine stopped");
        result
    }

    /// [`stop`](Self::stop) followed by [`join`](Self::join).
    ///
    /// # Errors
    ///
    /// As for [`join`](Self::join).
    pub fn shutdown(&mut self) -> Result<()> {
        self.stop();
        self.join()
    }

    /// Run one tick on the calling thread.
    ///
    /// Only allowed while stopped, when the engine holds the terminal.
    ///
    /// # Errors
    ///
    /// [`RenderError::NotStarted`] before [`open`](Self::open),
    /// [`RenderError::AlreadyRunning`] while the tick thread is alive, the
    /// unjoined error of a previous loop, or the terminal error after retries.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        let frame = Arc::clone(self.frame.as_ref().ok_or(RenderError::NotStarted)?);
        self.reclaim_terminal()?;
        let terminal = self.terminal.as_mut().ok_or(RenderError::ThreadPanicked)?;
        let outcome = lock_frame(&frame).tick(terminal, &self.config)?;
        Ok(outcome)
    }

    /// Write `content` into the cell at `(row, col)`.
    ///
    /// # Errors
    ///
    /// [`RenderError::OutOfRange`] if the cell is outside the current grid
    /// (nothing is written), or [`RenderError::NotStarted`].
    pub fn edit_cell(&self, row: usize, col: usize, content: impl Into<String>) -> Result<()> {
        self.with_frame(|frame| frame.content_mut().set(row, col, content))
    }

    /// Replace a whole row in one step. Missing trailing cells become empty.
    ///
    /// # Errors
    ///
    /// [`RenderError::OutOfRange`] if the row does not exist or too many
    /// cells are given (nothing is written), or [`RenderError::NotStarted`].
    pub fn edit_row<I, S>(&self, row: usize, cells: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_frame(|frame| frame.content_mut().set_row(row, cells))
    }

    /// Empty every cell.
    ///
    /// # Errors
    ///
    /// [`RenderError::NotStarted`].
    pub fn clear(&self) -> Result<()> {
        self.with_frame(|frame| {
            frame.content_mut().clear();
            Ok(())
        })
    }

    /// Apply several edits as one. A tick paints all of them or none.
    ///
    /// # Errors
    ///
    /// The first error `edit` returns (edits made before it stay applied),
    /// or [`RenderError::NotStarted`].
    pub fn update<R>(&self, edit: impl FnOnce(&mut Grid) -> Result<R>) -> Result<R> {
        self.with_frame(|frame| edit(frame.content_mut()))
    }

    /// Content of the cell at `(row, col)`.
    pub fn cell(&self, row: usize, col: usize) -> Option<String> {
        self.with_frame(|frame| Ok(frame.content().get(row, col).map(str::to_string)))
            .ok()
            .flatten()
    }

    /// The content grid, row by row.
    pub fn content_rows(&self) -> Option<Vec<Vec<String>>> {
        self.with_frame(|frame| Ok(frame.content().to_rows())).ok()
    }

    /// What was last painted, row by row.
    pub fn snapshot_rows(&self) -> Option<Vec<Vec<String>>> {
        self.with_frame(|frame| Ok(frame.snapshot().to_rows())).ok()
    }

    /// Current grid size as `(width, height)`.
    pub fn dimensions(&self) -> Option<(u16, u16)> {
        self.with_frame(|frame| Ok(frame.content().dimensions())).ok()
    }

    /// Render counters.
    pub fn stats(&self) -> RenderStats {
        self.with_frame(|frame| Ok(frame.stats())).unwrap_or_default()
    }

    /// Change the frame rate. Takes effect after the current sleep.
    ///
    /// # Errors
    ///
    /// [`RenderError::Config`] for zero; the previous rate stays.
    pub fn set_frame_rate(&self, fps: u32) -> Result<()> {
        if let Err(e) = check_frame_rate(fps) {
            warn!("rejected frame rate {fps}: {e}");
            return Err(e.into());
        }
        self.frame_rate.store(fps, Ordering::Relaxed);
        Ok(())
    }

    /// Current frame rate.
    pub fn frame_rate(&self) -> u32 {
        self.frame_rate.load(Ordering::Relaxed)
    }

    /// Current configuration: the one the engine was built with, carrying
    /// the frame rate last set by [`set_frame_rate`](Self::set_frame_rate).
    pub fn config(&self) -> RenderConfig {
        RenderConfig {
            frame_rate: self.frame_rate(),
            ..self.config.clone()
        }
    }

    /// The backend, while the engine is stopped.
    pub const fn terminal(&self) -> Option<&T> {
        self.terminal.as_ref()
    }

    fn with_frame<R>(&self, f: impl FnOnce(&mut Frame) -> Result<R>) -> Result<R> {
        let frame = self.frame.as_ref().ok_or(RenderError::NotStarted)?;
        f(&mut lock_frame(frame))
    }

    /// Get the terminal back from a finished tick thread, if there is one.
    fn reclaim_terminal(&mut self) -> Result<&mut T> {
        if self.ticker.as_ref().is_some_and(|ticker| !ticker.is_finished()) {
            return Err(RenderError::AlreadyRunning);
        }
        if self.ticker.is_some() {
            // A loop that died unjoined reports its error here, once. The
            // terminal is back either way, so the next call proceeds.
            self.join()?;
        }
        // Only a panicked tick thread loses the terminal.
        self.terminal.as_mut().ok_or(RenderError::ThreadPanicked)
    }
}

impl<T: Terminal + Send + 'static> Drop for Engine<T> {
    fn drop(&mut self) {
        if self.ticker.is_some() {
            let _ = self.shutdown();
        }
    }
}

impl<T: Terminal + Send + 'static> std::fmt::Debug for Engine<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("state", &self.state())
            .field("frame_rate", &self.frame_rate())
            .field("dimensions", &self.dimensions())
            .finish_non_exhaustive()
    }
}
