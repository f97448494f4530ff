//! Renderer notifications + terminal painting for the worksheet grid.
//!
//! The arithmetic engine never draws anything itself. It mutates the grid and
//! then tells whichever `GridRenderer` is attached which cells, underlines or
//! boxes changed. Every callback has a no-op default so tests and headless
//! callers can pass `NullRenderer`.
//!
//! Everything needed to repaint a cell (character, correctness, lock and
//! underline state) lives in the grid's `CellFlags`. A renderer only keeps
//! transient view state: which rows need repainting, where the cursor is, and
//! which locked box is highlighted.
//!
//! Exposed components:
//! - `GridRenderer` / `NullRenderer`: notification sink contract.
//! - `terminal::TerminalRenderer`: crossterm painter (two columns per cell).
//! - `dirty`: row tracker fed by notifications, drained per frame.
//! - `writer`: queued terminal commands flushed once per frame.
//! - `status`: status line composition.

use core_grid::Position;

pub mod dirty;
pub mod status;
pub mod terminal;
pub mod writer;

pub use terminal::{CELL_WIDTH, TerminalRenderer};

/// Rectangle of cells highlighted as one unit (a locked result box).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightBox {
    pub top_row: usize,
    pub bottom_row: usize,
    pub start_col: usize,
    pub end_col: usize,
}

impl HighlightBox {
    pub fn contains(&self, pos: Position) -> bool {
        (self.top_row..=self.bottom_row).contains(&pos.row)
            && (self.start_col..=self.end_col).contains(&pos.col)
    }
}

/// Notification sink for grid mutations. All methods are optional.
///
/// Column spans are inclusive on both ends.
pub trait GridRenderer {
    fn update_cell(&mut self, _row: usize, _col: usize) {}
    fn update_cursor(&mut self, _row: usize, _col: usize) {}
    fn add_underline(&mut self, _row: usize, _start_col: usize, _end_col: usize) {}
    fn remove_underline(&mut self, _row: usize, _start_col: usize, _end_col: usize) {}
    fn highlight_box(&mut self, _top_row: usize, _bottom_row: usize, _start_col: usize, _end_col: usize) {}
    fn clear_highlight(&mut self) {}
}

/// Renderer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl GridRenderer for NullRenderer {}
