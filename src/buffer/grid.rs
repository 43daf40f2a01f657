//! Grid: A row-major grid of text cells representing the managed screen.
//!
//! Each cell owns a `String`. A cell may hold a single character, a word,
//! or pre-styled text with embedded escape sequences; the grid never looks
//! inside it. Empty cells hold the empty string.

use crate::error::{RenderError, Result};

/// A grid of text cells.
///
/// Cells are stored in a contiguous `Vec` in row-major order:
/// `index = row * width + col`.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    /// Contiguous cell storage (row-major order).
    cells: Vec<String>,
    /// Width in columns.
    width: u16,
    /// Height in rows.
    height: u16,
}

impl Grid {
    /// Create a new grid with every cell empty.
    ///
    /// A zero axis yields a grid with no cells; it still compares and
    /// resizes like any other grid.
    pub fn new(width: u16, height: u16) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            cells: vec![String::new(); size],
            width,
            height,
        }
    }

    /// Get the grid width.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the grid height.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Get `(width, height)`.
    #[inline]
    pub const fn dimensions(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Get the total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the grid has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Convert `(row, col)` to a linear index.
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub fn index_of(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.height as usize && col < self.width as usize {
            Some(row * (self.width as usize) + col)
        } else {
            None
        }
    }

    /// Get the content of the cell at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.index_of(row, col).map(|i| self.cells[i].as_str())
    }

    /// Replace the content of the cell at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::OutOfRange`] if either coordinate is outside
    /// the grid. The grid is left unchanged.
    pub fn set(&mut self, row: usize, col: usize, content: impl Into<String>) -> Result<()> {
        let idx = self.checked_index(row, col)?;
        self.cells[idx] = content.into();
        Ok(())
    }

    /// Replace a whole row.
    ///
    /// Cells beyond `contents.len()` become empty.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::OutOfRange`] if the row does not exist or more
    /// cells are supplied than the grid is wide. The grid is left unchanged.
    pub fn set_row<I, S>(&mut self, row: usize, contents: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let width = self.width as usize;
        let start = self.checked_index(row, 0)?;
        let mut new_row: Vec<String> = contents.into_iter().map(Into::into).collect();
        if new_row.len() > width {
            return Err(self.out_of_range(row, new_row.len() - 1));
        }
        new_row.resize(width, String::new());
        for (cell, content) in self.cells[start..start + width].iter_mut().zip(new_row) {
            *cell = content;
        }
        Ok(())
    }

    /// Empty every cell.
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(String::clear);
    }

    /// Resize the grid, preserving content where possible.
    ///
    /// Cells present in both shapes keep their content, newly exposed cells
    /// are empty, and cells outside the new shape are dropped.
    pub fn resize(&mut self, new_width: u16, new_height: u16) {
        if new_width == self.width && new_height == self.height {
            return;
        }

        let new_size = (new_width as usize) * (new_height as usize);
        let mut new_cells = vec![String::new(); new_size];

        let copy_width = self.width.min(new_width) as usize;
        let copy_height = self.height.min(new_height) as usize;

        for row in 0..copy_height {
            let old_start = row * (self.width as usize);
            let new_start = row * (new_width as usize);
            for col in 0..copy_width {
                new_cells[new_start + col] = std::mem::take(&mut self.cells[old_start + col]);
            }
        }

        self.cells = new_cells;
        self.width = new_width;
        self.height = new_height;
    }

    /// Copy content from another grid.
    ///
    /// The grids must have the same dimensions. Each cell is cloned into
    /// this grid's own storage, so later edits to `other` never show up here.
    pub fn copy_from(&mut self, other: &Self) {
        debug_assert_eq!(self.dimensions(), other.dimensions());
        self.cells.clone_from_slice(&other.cells);
    }

    /// Get an iterator over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        // `chunks` panics on zero, and a zero-width grid has no cells anyway.
        self.cells.chunks(usize::from(self.width.max(1)))
    }

    /// Rows as owned vectors, for inspection in tests and tools.
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        self.rows().map(<[String]>::to_vec).collect()
    }

    fn checked_index(&self, row: usize, col: usize) -> Result<usize> {
        self.index_of(row, col).ok_or_else(|| self.out_of_range(row, col))
    }

    const fn out_of_range(&self, row: usize, col: usize) -> RenderError {
        RenderError::OutOfRange {
            row,
            col,
            height: self.height,
            width: self.width,
        }
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("filled", &self.cells.iter().filter(|c| !c.is_empty()).count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_new() {
        let grid = Grid::new(10, 3);
        assert_eq!(grid.width(), 10);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.len(), 30);
        assert!(grid.rows().flatten().all(String::is_empty));
    }

    #[test]
    fn test_grid_get_set() {
        let mut grid = Grid::new(10, 3);
        grid.set(1, 0, "hello").unwrap();
        assert_eq!(grid.get(1, 0), Some("hello"));
        assert_eq!(grid.get(0, 0), Some(""));
    }

    #[test]
    fn test_grid_round_trip_every_cell() {
        let mut grid = Grid::new(4, 3);
        for row in 0..3 {
            for col in 0..4 {
                grid.set(row, col, format!("{row}:{col}")).unwrap();
            }
        }
        for row in 0..3 {
            for col in 0..4 {
                assert_eq!(grid.get(row, col), Some(format!("{row}:{col}").as_str()));
            }
        }
    }

    #[test]
    fn test_grid_out_of_range_leaves_grid_unchanged() {
        let mut grid = Grid::new(10, 3);
        grid.set(0, 0, "keep").unwrap();
        let before = grid.clone();

        let err = grid.set(3, 0, "x").unwrap_err();
        assert!(matches!(
            err,
            RenderError::OutOfRange { row: 3, col: 0, height: 3, width: 10 }
        ));
        assert!(grid.set(0, 10, "x").is_err());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_grid_set_row() {
        let mut grid = Grid::new(3, 2);
        grid.set(1, 2, "old").unwrap();
        grid.set_row(1, ["a", "b"]).unwrap();
        assert_eq!(grid.to_rows()[1], vec!["a", "b", ""]);

        assert!(grid.set_row(1, ["a", "b", "c", "d"]).is_err());
        assert!(grid.set_row(2, ["a"]).is_err());
        assert_eq!(grid.to_rows()[1], vec!["a", "b", ""]);
    }

    #[test]
    fn test_grid_resize_preserves_overlap() {
        let mut grid = Grid::new(10, 3);
        grid.set(1, 4, "X").unwrap();
        grid.set(2, 9, "edge").unwrap();

        grid.resize(20, 6);
        assert_eq!(grid.dimensions(), (20, 6));
        assert_eq!(grid.get(1, 4), Some("X"));
        assert_eq!(grid.get(2, 9), Some("edge"));
        assert_eq!(grid.get(5, 19), Some(""));
        assert_eq!(grid.get(1, 15), Some(""));

        grid.resize(5, 2);
        assert_eq!(grid.get(1, 4), Some("X"));
        assert!(grid.get(2, 9).is_none());

        // Growing back never resurrects dropped cells.
        grid.resize(10, 3);
        assert_eq!(grid.get(2, 9), Some(""));
    }

    #[test]
    fn test_grid_copy_is_independent() {
        let mut content = Grid::new(4, 2);
        let mut snapshot = Grid::new(4, 2);
        content.set(0, 0, "a").unwrap();
        snapshot.copy_from(&content);
        content.set(0, 0, "b").unwrap();
        assert_eq!(snapshot.get(0, 0), Some("a"));
    }

    #[test]
    fn test_grid_zero_size() {
        let mut grid = Grid::new(0, 0);
        assert!(grid.is_empty());
        assert_eq!(grid.rows().count(), 0);
        grid.resize(2, 1);
        assert_eq!(grid.to_rows(), vec![vec![String::new(), String::new()]]);
    }

    #[test]
    fn test_grid_clear() {
        let mut grid = Grid::new(2, 2);
        grid.set(1, 1, "x").unwrap();
        grid.clear();
        assert_eq!(grid, Grid::new(2, 2));
    }
}
