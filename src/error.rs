//! Error types for the render engine.

use std::fmt;
use std::io;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Rejected configuration values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A frame rate of zero ticks per second.
    ZeroFrameRate,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroFrameRate => write!(f, "frame rate must be at least 1 tick per second"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors reported by the render engine.
#[derive(Debug)]
pub enum RenderError {
    /// A cell coordinate outside the current grid.
    OutOfRange {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// Grid height at the time of the call.
        height: u16,
        /// Grid width at the time of the call.
        width: u16,
    },
    /// An invalid configuration value. The previous value stays in effect.
    Config(ConfigError),
    /// `start` was called on a running engine.
    AlreadyRunning,
    /// The engine has never been started, so there is no buffer yet.
    NotStarted,
    /// The terminal could not be queried or written.
    Terminal(io::Error),
    /// The tick thread panicked.
    ThreadPanicked,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { row, col, height, width } => write!(
                f,
                "cell ({row}, {col}) is outside the {height}x{width} screen"
            ),
            Self::Config(e) => write!(f, "invalid configuration: {e}"),
            Self::AlreadyRunning => write!(f, "render engine is already running"),
            Self::NotStarted => write!(f, "render engine has not been started"),
            Self::Terminal(e) => write!(f, "terminal I/O failed: {e}"),
            Self::ThreadPanicked => write!(f, "render thread panicked"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Terminal(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RenderError {
    fn from(e: io::Error) -> Self {
        Self::Terminal(e)
    }
}

impl From<ConfigError> for RenderError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_out_of_range_message() {
        let err = RenderError::OutOfRange { row: 3, col: 0, height: 3, width: 10 };
        assert_eq!(err.to_string(), "cell (3, 0) is outside the 3x10 screen");
    }

    #[test]
    fn test_terminal_error_source() {
        let err = RenderError::from(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("gone"));
    }
}
