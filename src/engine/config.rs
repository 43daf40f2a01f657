//! Render engine configuration.

use crate::error::ConfigError;
use log::warn;
use std::time::Duration;

/// Environment variable overriding [`RenderConfig::frame_rate`].
pub const ENV_FPS: &str = "TICKSCREEN_FPS";
/// Environment variable overriding [`RenderConfig::io_retries`].
pub const ENV_IO_RETRIES: &str = "TICKSCREEN_IO_RETRIES";

/// Configuration for the render engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Ticks per second.
    pub frame_rate: u32,
    /// How many times a failed terminal query or repaint is retried within
    /// one tick before the loop gives up.
    pub io_retries: u32,
    /// Pause between retries.
    ///
    /// The pause is taken inside the tick, with the frame locked, so edits
    /// issued meanwhile wait for it. See [`max_retry_stall`](Self::max_retry_stall).
    pub retry_backoff: Duration,
    /// Leave the cursor on the row below the painted region after a repaint.
    ///
    /// This only lands below the grid when the grid is shorter than the
    /// screen. A grid as tall as the terminal (the default for
    /// `start(None)`) leaves the cursor clamped to its last row, where any
    /// other output to the terminal will overwrite it.
    pub cursor_below: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            frame_rate: 30,
            io_retries: 3,
            retry_backoff: Duration::from_millis(5),
            cursor_below: true,
        }
    }
}

impl RenderConfig {
    /// Defaults, overridden by `TICKSCREEN_FPS` and `TICKSCREEN_IO_RETRIES`.
    ///
    /// Values that do not parse, or a zero frame rate, are logged and ignored.
    pub fn from_env() -> Self {
        Self::default().with_env_lookup(|key| std::env::var(key).ok())
    }

    fn with_env_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(ENV_FPS) {
            match raw.trim().parse::<u32>() {
                Ok(fps) if fps > 0 => self.frame_rate = fps,
                _ => warn!("ignoring {ENV_FPS}={raw:?}: expected a positive integer"),
            }
        }
        if let Some(raw) = lookup(ENV_IO_RETRIES) {
            match raw.trim().parse::<u32>() {
                Ok(retries) => self.io_retries = retries,
                Err(_) => warn!("ignoring {ENV_IO_RETRIES}={raw:?}: expected an integer"),
            }
        }
        self
    }

    /// Builder: set the frame rate.
    #[must_use]
    pub const fn with_frame_rate(mut self, fps: u32) -> Self {
        self.frame_rate = fps;
        self
    }

    /// Builder: set the retry budget.
    #[must_use]
    pub const fn with_io_retries(mut self, retries: u32) -> Self {
        self.io_retries = retries;
        self
    }

    /// Builder: set the pause between retries.
    #[must_use]
    pub const fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Builder: choose where the cursor is left after a repaint.
    #[must_use]
    pub const fn with_cursor_below(mut self, cursor_below: bool) -> Self {
        self.cursor_below = cursor_below;
        self
    }

    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroFrameRate`] for a zero frame rate.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        check_frame_rate(self.frame_rate)
    }

    /// Time between ticks.
    pub fn frame_interval(&self) -> Duration {
        frame_interval(self.frame_rate)
    }

    /// Longest one tick can sit in retry backoff while holding the frame:
    /// every retry of the size query and of the repaint.
    pub fn max_retry_stall(&self) -> Duration {
        self.retry_backoff.saturating_mul(self.io_retries.saturating_mul(2))
    }
}

pub(crate) const fn check_frame_rate(fps: u32) -> Result<(), ConfigError> {
    if fps == 0 {
        Err(ConfigError::ZeroFrameRate)
    } else {
        Ok(())
    }
}

/// `1s / fps`, with zero treated as one tick per second.
pub(crate) fn frame_interval(fps: u32) -> Duration {
    Duration::from_secs(1) / fps.max(1)
}
