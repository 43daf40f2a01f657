//! # Tickscreen
//!
//! A flicker-free differential renderer for live terminal dashboards.
//!
//! Tickscreen keeps an off-screen grid of text cells, and a snapshot of
//! what was last written to the terminal. A background thread ticks at a
//! fixed frame rate; each tick it checks the terminal size, compares the
//! grid with the snapshot, and repaints only when something changed.
//!
//! ## Core Concepts
//!
//! - **Double-buffered rendering**: Content and Snapshot grids
//! - **Skip-if-equal**: An unchanged frame writes nothing, not even a cursor move
//! - **Resize reconciliation**: Content is reshaped in place, keeping what still fits
//! - **One lock per tick**: Edits never tear a repaint
//!
//! ## Example
//!
//! ```rust,ignore
//! use tickscreen::{style_text, Color, CrosstermTerminal, Engine, RenderConfig};
//!
//! let mut engine = Engine::new(CrosstermTerminal::new(), RenderConfig::default())?;
//! engine.start(None)?;
//! engine.edit_cell(0, 0, style_text("ready", Color::Green, Color::Black, true))?;
//! engine.shutdown()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod buffer;
pub mod engine;
pub mod error;
pub mod style;
pub mod terminal;

// Re-exports for convenience
pub use buffer::Grid;
pub use engine::{Engine, EngineState, Frame, RenderConfig, RenderStats, TickOutcome};
pub use error::{ConfigError, RenderError, Result};
pub use style::{style_text, Color, Modifiers, Style};
pub use terminal::{dimensions, CrosstermTerminal, MemoryTerminal, Terminal, TerminalEvent};
