//! Render engine: The content buffer, the snapshot, and the tick loop.
//!
//! # Architecture
//!
//! ```text
//!  edit_cell / edit_row / clear           tick thread (every 1/fps s)
//! ┌──────────────────────────┐        ┌──────────────────────────────┐
//! │ caller threads           │        │ 1. query size                │
//! │                          │        │ 2. reshape on change         │
//! │         lock ──────────▶ │ Frame  │ 3. content == snapshot?      │
//! │                          │ ◀───── │ 4. repaint + copy snapshot   │
//! └──────────────────────────┘  lock  └──────────────────────────────┘
//! ```
//!
//! Steps 1 to 4 happen under one lock, so a repaint never mixes content
//! from before and after an edit.

mod config;
#[allow(clippy::module_inception)]
mod engine;
mod frame;
mod ticker;

pub use config::{RenderConfig, ENV_FPS, ENV_IO_RETRIES};
pub use engine::{Engine, EngineState};
pub use frame::{Frame, RenderStats, TickOutcome};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock the frame, recovering from poisoning.
pub(crate) fn lock_frame(frame: &Mutex<Frame>) -> MutexGuard<'_, Frame> {
    frame.lock().unwrap_or_else(PoisonError::into_inner)
}
