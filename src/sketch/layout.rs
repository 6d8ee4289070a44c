//! Grid layout derived from the viewport size.

use crate::params::grid_constants::{CELL_RATIO, COLS, PADDING, ROWS};

/// Drawable area in logical pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Top-left corner of a grid cell
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellPosition {
    pub x: f64,
    pub y: f64,
}

/// Cell size and grid origin for one frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GridLayout {
    pub cell_size: f64,
    pub starting_x: f64,
    pub starting_y: f64,
}

impl GridLayout {
    /// Compute the layout from scratch for a viewport.
    ///
    /// A zero or negative viewport yields degenerate geometry, never an error.
    pub fn compute(viewport: Viewport) -> Self {
        let cell_size = (viewport.width / CELL_RATIO).round();
        Self {
            cell_size,
            starting_x: (viewport.width - cell_size * COLS as f64) / 2.0,
            starting_y: (viewport.height - cell_size * ROWS as f64) / 2.0,
        }
    }

    /// Position of cell `(i, j)`: column `i`, row `j`
    pub fn locate(&self, i: usize, j: usize) -> CellPosition {
        CellPosition {
            x: self.starting_x + i as f64 * self.cell_size + i as f64 * PADDING,
            y: self.starting_y + j as f64 * self.cell_size + j as f64 * PADDING,
        }
    }
}
