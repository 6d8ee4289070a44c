//! Audio-reactive cell visualizations.

use super::draw::{Color, DrawList, Rect, TextAlign};
use super::history::AmplitudeHistory;
use super::layout::CellPosition;
use super::map::log_map;

/// Grey level for a fully-extended level (quiet input)
const QUIET_GRAY: f64 = 40.0;

/// Grey level for a zero level (loud input)
const LOUD_GRAY: f64 = 220.0;

/// Debug text column for the history bars (logical pixels)
const DEBUG_TEXT_X: f64 = 100.0;
const DEBUG_TEXT_Y: f64 = 100.0;
const DEBUG_TEXT_STEP: f64 = 20.0;

/// Visualization assigned to a grid cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    /// Fill rising from the bottom edge
    Threshold,
    /// Ten bars replaying the recent amplitude history
    HistoryBars,
    /// Centred square outline
    PulsingOutline,
    /// Background square only
    Plain,
}

impl CellKind {
    /// Visualization for column `i`, row `j`
    pub fn at(i: usize, j: usize) -> Self {
        match (i, j) {
            (0, 0) => CellKind::Threshold,
            (1, 0) => CellKind::HistoryBars,
            (2, 0) => CellKind::PulsingOutline,
            _ => CellKind::Plain,
        }
    }
}

/// Everything a cell needs to draw itself for one frame
#[derive(Clone, Copy, Debug)]
pub struct Cell {
    pub position: CellPosition,
    pub size: f64,
}

impl Cell {
    /// Distance of the fill's top edge from the cell's top edge.
    ///
    /// Full cell size at silence, approaching zero at full amplitude.
    pub fn level(&self, amplitude: f64) -> f64 {
        log_map(amplitude, 0.0, 1.0, self.size, 0.0)
    }

    /// Grey shade for a level computed by [`Cell::level`]
    pub fn shade(&self, level: f64) -> f64 {
        log_map(level, 0.0, self.size, LOUD_GRAY, QUIET_GRAY)
    }

    /// White background square
    pub fn draw_background(&self, list: &mut DrawList) {
        list.fill_rect(
            Rect::new(self.position.x, self.position.y, self.size, self.size),
            Color::WHITE,
        );
    }
}

/// Run the visualization of `kind` on `cell`
pub fn visualize(
    list: &mut DrawList,
    kind: CellKind,
    cell: &Cell,
    amplitude: f64,
    history: &mut AmplitudeHistory,
    text_size: f64,
) {
    match kind {
        CellKind::Threshold => threshold(list, cell, amplitude),
        CellKind::HistoryBars => history_bars(list, cell, amplitude, history, text_size),
        CellKind::PulsingOutline => pulsing_outline(list, cell, amplitude),
        CellKind::Plain => {}
    }
}

fn threshold(list: &mut DrawList, cell: &Cell, amplitude: f64) {
    let level = cell.level(amplitude);
    let shade = cell.shade(level);
    list.fill_rect(
        Rect::new(
            cell.position.x,
            cell.position.y + level,
            cell.size,
            cell.size - level,
        ),
        Color::gray(shade),
    );
}

fn history_bars(
    list: &mut DrawList,
    cell: &Cell,
    amplitude: f64,
    history: &mut AmplitudeHistory,
    text_size: f64,
) {
    let bar_width = cell.size / history.len() as f64;
    history.push(amplitude);

    for (k, sample) in history.iter().enumerate() {
        let x = cell.position.x + k as f64 * bar_width;
        let level = cell.level(sample);
        list.text(
            format!("{:.3}", level),
            DEBUG_TEXT_X,
            DEBUG_TEXT_Y + k as f64 * DEBUG_TEXT_STEP,
            text_size,
            TextAlign::Left,
            Color::WHITE,
        );
        let shade = cell.shade(level);
        list.fill_rect(
            Rect::new(x, cell.position.y + level, bar_width, cell.size - level),
            Color::gray(shade),
        );
    }
}

fn pulsing_outline(list: &mut DrawList, cell: &Cell, amplitude: f64) {
    let level = cell.level(amplitude);
    let shade = cell.shade(level);
    let center_x = cell.position.x + cell.size / 2.0;
    let center_y = cell.position.y + cell.size / 2.0;
    let edge = cell.size - level;
    list.stroke_rect(
        Rect::centered(center_x, center_y, edge, edge),
        Color::gray(shade),
        cell.size / 20.0,
    );
}
