//! Buffer module: The double-buffer data structures.
//!
//! This module contains:
//! - [`Grid`]: A grid of text cells, used both for the content being built
//!   and for the snapshot of what the terminal currently shows
//! - [`diff`]: Change detection and the full repaint

mod grid;
pub mod diff;

pub use grid::Grid;
