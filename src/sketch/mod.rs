//! The visualizer loop: display mode, grid layout and per-frame drawing.
//!
//! All state that a frame depends on lives in [`Visualizer`]; the platform
//! layer feeds it input events and one amplitude sample per frame and gets
//! back a [`DrawList`].

mod cells;
mod draw;
mod history;
mod layout;
mod map;
mod mode;

// Re-export public types
pub use cells::{Cell, CellKind};
pub use draw::{Color, DrawCommand, DrawList, Rect, TextAlign};
pub use history::AmplitudeHistory;
pub use layout::{CellPosition, GridLayout, Viewport};
pub use map::{log_map, SPAN_EPSILON, ZERO_EPSILON};
pub use mode::{DisplayMode, Screen};

use crate::params::grid_constants::{COLS, ROWS};
use crate::params::SketchParams;

/// Title shown on the welcome screen
pub const TITLE: &str = "nanovisual";

/// Second welcome line, shown from the first click
pub const ATTRIBUTION: &str = "@ jakub illukowicz";

/// Offset of the attribution below the title (logical pixels)
const ATTRIBUTION_OFFSET: f64 = 20.0;

/// Viewport width divided by this gives the text size
const TEXT_RATIO: f64 = 150.0;

const CANVAS_COLOR: Color = Color::BLACK;

/// Audio-reactive sketch state owned by the render loop
#[derive(Debug, Clone)]
pub struct Visualizer {
    mode: DisplayMode,
    viewport: Viewport,
    layout: GridLayout,
    history: AmplitudeHistory,
}

impl Visualizer {
    /// Create the sketch for an initial viewport
    pub fn new(params: &SketchParams, viewport: Viewport) -> Self {
        Self {
            mode: DisplayMode::new(params.initial_mode()),
            viewport,
            layout: GridLayout::compute(viewport),
            history: AmplitudeHistory::new(),
        }
    }

    /// Pointer press: advance the display mode by one
    pub fn pointer_pressed(&mut self) {
        self.mode.advance();
        log::debug!("Display mode -> {}", self.mode.value());
    }

    /// Viewport changed: recompute the layout immediately
    pub fn resized(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.layout = GridLayout::compute(viewport);
        log::debug!(
            "Viewport {}x{}, cell size {}",
            viewport.width,
            viewport.height,
            self.layout.cell_size
        );
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    pub fn history(&self) -> &AmplitudeHistory {
        &self.history
    }

    /// Render one frame for the current amplitude reading
    pub fn draw(&mut self, amplitude: f64) -> DrawList {
        self.layout = GridLayout::compute(self.viewport);

        let mut list = DrawList::new();
        list.background(CANVAS_COLOR);

        match self.mode.screen() {
            Screen::Welcome0 | Screen::Welcome1 => self.welcome_screen(&mut list),
            Screen::Grid => self.grid(&mut list, amplitude),
        }

        list
    }

    fn text_size(&self) -> f64 {
        self.viewport.width / TEXT_RATIO
    }

    fn welcome_screen(&self, list: &mut DrawList) {
        let x = self.viewport.width / 2.0;
        let y = self.viewport.height / 2.0;
        let size = self.text_size();

        list.text(TITLE, x, y, size, TextAlign::Center, Color::WHITE);
        if self.mode.screen() == Screen::Welcome1 {
            list.text(
                ATTRIBUTION,
                x,
                y + ATTRIBUTION_OFFSET,
                size,
                TextAlign::Center,
                Color::WHITE,
            );
        }
    }

    fn grid(&mut self, list: &mut DrawList, amplitude: f64) {
        let text_size = self.text_size();

        // Column-major order
        for i in 0..COLS {
            for j in 0..ROWS {
                let cell = Cell {
                    position: self.layout.locate(i, j),
                    size: self.layout.cell_size,
                };
                cell.draw_background(list);
                cells::visualize(
                    list,
                    CellKind::at(i, j),
                    &cell,
                    amplitude,
                    &mut self.history,
                    text_size,
                );
            }
        }
    }
}
