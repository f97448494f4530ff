//! Crossterm painter for the worksheet.
//!
//! Layout: grid row `r` is drawn on screen row `r`; grid column `c` occupies
//! screen columns `[c * CELL_WIDTH, c * CELL_WIDTH + CELL_WIDTH)`. The status
//! line sits directly below the last grid row.
//!
//! Paint paths:
//! 1. Full: first frame or after `invalidate` (resize, worksheet replaced).
//!    Every grid row plus the status line.
//! 2. Rows: dirty rows reported through `GridRenderer` callbacks, plus the
//!    previous and current cursor rows. The status line is repainted only
//!    when its text changed.

use crate::dirty::DirtyRowsTracker;
use crate::writer::{CellStyle, Writer};
use crate::{GridRenderer, HighlightBox};
use anyhow::Result;
use core_grid::{CellFlags, Grid, Position};
use crossterm::style::Color;
use tracing::trace;

/// Screen columns used per grid cell.
pub const CELL_WIDTH: u16 = 2;

const EMPTY_GLYPH: char = '.';

#[derive(Debug)]
pub struct TerminalRenderer {
    dirty: DirtyRowsTracker,
    highlight: Option<HighlightBox>,
    cursor: Position,
    painted_cursor: Option<Position>,
    prev_status: Option<String>,
    full: bool,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            dirty: DirtyRowsTracker::new(),
            highlight: None,
            cursor: Position::origin(),
            painted_cursor: None,
            prev_status: None,
            full: true,
        }
    }

    /// Force the next frame down the full path.
    pub fn invalidate(&mut self) {
        self.full = true;
        self.dirty.clear();
        self.prev_status = None;
    }

    pub fn highlight(&self) -> Option<HighlightBox> {
        self.highlight
    }

    /// Map a screen coordinate (e.g. a mouse click) to a grid cell.
    pub fn cell_at_screen(x: u16, y: u16) -> Position {
        Position::new(y as usize, (x / CELL_WIDTH) as usize)
    }

    pub fn paint(&mut self, grid: &Grid, status: &str) -> Result<()> {
        let mut w = Writer::new();
        self.compose(grid, status, &mut w);
        w.flush()
    }

    /// Queue the commands for the next frame without touching the terminal.
    pub fn compose(&mut self, grid: &Grid, status: &str, w: &mut Writer) {
        let rows: Vec<usize> = if self.full {
            self.dirty.clear();
            w.clear_all();
            (0..grid.rows()).collect()
        } else {
            let mut rows = self.dirty.take_within(grid.rows());
            rows.push(self.cursor.row);
            if let Some(prev) = self.painted_cursor {
                rows.push(prev.row);
            }
            rows.retain(|r| *r < grid.rows());
            rows.sort_unstable();
            rows.dedup();
            rows
        };
        trace!(target: "render", full = self.full, rows = rows.len(), "compose_frame");
        for row in &rows {
            self.paint_row(grid, *row, w);
        }
        let status_row = grid.rows() as u16;
        if self.full || self.prev_status.as_deref() != Some(status) {
            w.move_to(0, status_row);
            w.clear_line();
            w.print(status);
            self.prev_status = Some(status.to_string());
        }
        self.painted_cursor = Some(self.cursor);
        self.full = false;
    }

    fn paint_row(&self, grid: &Grid, row: usize, w: &mut Writer) {
        w.move_to(0, row as u16);
        for col in 0..grid.cols() {
            let pos = Position::new(row, col);
            let style = self.cell_style(grid.flags(row, col), pos);
            let text = match grid.get(row, col) {
                Some(ch) => format!("{ch} "),
                None => format!("{EMPTY_GLYPH} "),
            };
            let style = if grid.get(row, col).is_none() && style.fg.is_none() {
                CellStyle {
                    fg: Some(Color::DarkGrey),
                    ..style
                }
            } else {
                style
            };
            w.styled(text, style);
        }
    }

    fn cell_style(&self, flags: CellFlags, pos: Position) -> CellStyle {
        let mut style = CellStyle {
            underline: flags.contains(CellFlags::UNDERLINE),
            bold: flags.contains(CellFlags::LOCKED),
            reverse: pos == self.cursor,
            ..CellStyle::default()
        };
        if flags.contains(CellFlags::CORRECT) {
            style.fg = Some(Color::Green);
        } else if flags.contains(CellFlags::WRONG) {
            style.fg = Some(Color::Red);
        }
        if self.highlight.is_some_and(|h| h.contains(pos)) {
            style.bg = Some(Color::DarkBlue);
        }
        style
    }

    fn mark_highlight_rows(&mut self) {
        if let Some(h) = self.highlight {
            self.dirty.mark_range(h.top_row, h.bottom_row);
        }
    }
}

impl GridRenderer for TerminalRenderer {
    fn update_cell(&mut self, row: usize, _col: usize) {
        self.dirty.mark(row);
    }

    fn update_cursor(&mut self, row: usize, col: usize) {
        self.cursor = Position::new(row, col);
    }

    fn add_underline(&mut self, row: usize, _start_col: usize, _end_col: usize) {
        self.dirty.mark(row);
    }

    fn remove_underline(&mut self, row: usize, _start_col: usize, _end_col: usize) {
        self.dirty.mark(row);
    }

    fn highlight_box(&mut self, top_row: usize, bottom_row: usize, start_col: usize, end_col: usize) {
        let next = HighlightBox {
            top_row,
            bottom_row,
            start_col,
            end_col,
        };
        if self.highlight == Some(next) {
            return;
        }
        self.mark_highlight_rows();
        self.highlight = Some(next);
        self.mark_highlight_rows();
    }

    fn clear_highlight(&mut self) {
        self.mark_highlight_rows();
        self.highlight = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::Command;

    fn row_moves(w: &Writer) -> Vec<u16> {
        w.commands()
            .iter()
            .filter_map(|c| match c {
                Command::MoveTo(0, y) => Some(*y),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn first_frame_is_full_then_only_dirty_rows() {
        let mut grid = Grid::new(4, 3);
        let mut r = TerminalRenderer::new();
        let mut w = Writer::new();
        r.compose(&grid, "status", &mut w);
        assert_eq!(row_moves(&w), vec![0, 1, 2, 3, 4]);
        assert_eq!(w.commands().first(), Some(&Command::ClearAll));

        grid.set_char(2, 1, '5');
        r.update_cell(2, 1);
        let mut w = Writer::new();
        r.compose(&grid, "status", &mut w);
        // cursor row 0 + dirty row 2, status unchanged
        assert_eq!(row_moves(&w), vec![0, 2]);
    }

    #[test]
    fn highlight_marks_old_and_new_rows() {
        let grid = Grid::new(8, 4);
        let mut r = TerminalRenderer::new();
        r.compose(&grid, "", &mut Writer::new());
        r.highlight_box(1, 2, 0, 1);
        r.highlight_box(5, 6, 0, 1);
        let mut w = Writer::new();
        r.compose(&grid, "", &mut w);
        assert_eq!(row_moves(&w), vec![0, 1, 2, 5, 6]);
        assert!(r.highlight().is_some_and(|h| h.contains(Position::new(6, 1))));
    }

    #[test]
    fn locked_correct_cell_is_bold_green() {
        let mut grid = Grid::new(1, 2);
        grid.set_char(0, 1, '9');
        grid.insert_flags(0, 1, CellFlags::LOCKED | CellFlags::CORRECT);
        let r = TerminalRenderer::new();
        let style = r.cell_style(grid.flags(0, 1), Position::new(0, 1));
        assert!(style.bold);
        assert_eq!(style.fg, Some(Color::Green));
    }

    #[test]
    fn screen_to_cell_mapping_uses_cell_width() {
        assert_eq!(TerminalRenderer::cell_at_screen(5, 3), Position::new(3, 2));
    }
}
