//! Sketch layout and mode parameters.

/// Grid constants (compile-time, fixed by the sketch layout)
pub mod grid_constants {
    /// Number of cell columns
    pub const COLS: usize = 4;

    /// Number of cell rows
    pub const ROWS: usize = 4;

    /// Gap between neighbouring cells (logical pixels)
    pub const PADDING: f64 = 20.0;

    /// Viewport width divided by this gives the cell edge length
    pub const CELL_RATIO: f64 = 15.0;

    /// Number of samples kept by the over-time cell
    pub const HISTORY_LEN: usize = 10;
}

/// Startup parameters for the visualizer loop
#[derive(Debug, Clone, Default)]
pub struct SketchParams {
    /// Skip the welcome screen and start directly on the grid (mode 2)
    pub debug: bool,
}

impl SketchParams {
    /// Display mode the loop starts in
    pub fn initial_mode(&self) -> u64 {
        if self.debug {
            2
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_mode() {
        assert_eq!(SketchParams::default().initial_mode(), 0);
        assert_eq!(SketchParams { debug: true }.initial_mode(), 2);
    }
}
