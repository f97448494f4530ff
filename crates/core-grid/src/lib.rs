//! Fixed-size character grid backing a worksheet.
//!
//! Every cell holds at most one character plus a small set of metadata flags.
//! The flags carry correctness and lock state explicitly so higher layers can
//! query them without consulting whatever renderer is attached.
//!
//! Invariants:
//! - `cells.len() == rows * cols` at all times.
//! - Reads outside the grid yield an empty cell; writes outside the grid are
//!   ignored. Callers never need to pre-check bounds for safety, only for
//!   semantics.

use bitflags::bitflags;

pub mod persist;
pub use persist::{GridError, MAX_IMPORT_CELLS, export_json, import_json};

/// Default worksheet height in rows.
pub const DEFAULT_ROWS: usize = 30;
/// Default worksheet width in columns.
pub const DEFAULT_COLS: usize = 24;

/// A cell coordinate expressed as (row, column), both zero based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
    pub fn origin() -> Self {
        Self { row: 0, col: 0 }
    }
    /// Clamp into a `rows x cols` grid. A zero-sized grid clamps to the origin.
    pub fn clamp_to(&mut self, rows: usize, cols: usize) {
        self.row = self.row.min(rows.saturating_sub(1));
        self.col = self.col.min(cols.saturating_sub(1));
    }
}

bitflags! {
    /// Per-cell metadata describing result-entry state and decoration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CellFlags: u8 {
        const LOCKED    = 0b0000_0001; // part of a correctly completed result
        const CORRECT   = 0b0000_0010;
        const WRONG     = 0b0000_0100;
        const UNDERLINE = 0b0000_1000;
    }
}

impl CellFlags {
    /// Correctness coloring only; lock and underline survive a recolor.
    pub const COLORING: CellFlags = CellFlags::CORRECT.union(CellFlags::WRONG);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub ch: Option<char>,
    pub flags: CellFlags,
}

impl Cell {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ch.is_none()
    }
    #[inline]
    pub fn is_digit(&self) -> bool {
        self.ch.is_some_and(|c| c.is_ascii_digit())
    }
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.flags.contains(CellFlags::LOCKED)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLS)
    }
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::default(); rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        self.in_bounds(row, col).then(|| row * self.cols + col)
    }

    /// Cell at (row, col), `None` when out of bounds.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.index(row, col).map(|i| &self.cells[i])
    }

    /// Character at (row, col); empty and out-of-bounds cells both read as `None`.
    pub fn get(&self, row: usize, col: usize) -> Option<char> {
        self.cell(row, col).and_then(|c| c.ch)
    }

    pub fn is_digit(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).is_some_and(Cell::is_digit)
    }

    pub fn is_locked(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).is_some_and(Cell::is_locked)
    }

    pub fn set_char(&mut self, row: usize, col: usize, ch: char) {
        if let Some(i) = self.index(row, col) {
            self.cells[i].ch = Some(ch);
        }
    }

    /// Remove the character at (row, col). Flags are left untouched.
    pub fn clear_cell(&mut self, row: usize, col: usize) {
        if let Some(i) = self.index(row, col) {
            self.cells[i].ch = None;
        }
    }

    /// Remove the character and every flag at (row, col).
    pub fn reset_cell(&mut self, row: usize, col: usize) {
        if let Some(i) = self.index(row, col) {
            self.cells[i] = Cell::default();
        }
    }

    pub fn flags(&self, row: usize, col: usize) -> CellFlags {
        self.cell(row, col).map(|c| c.flags).unwrap_or_default()
    }

    pub fn insert_flags(&mut self, row: usize, col: usize, flags: CellFlags) {
        if let Some(i) = self.index(row, col) {
            self.cells[i].flags.insert(flags);
        }
    }

    pub fn remove_flags(&mut self, row: usize, col: usize, flags: CellFlags) {
        if let Some(i) = self.index(row, col) {
            self.cells[i].flags.remove(flags);
        }
    }

    /// True when any cell in `[start, end]` on `row` holds a character.
    /// Rows outside the grid have no content; columns are clipped.
    pub fn row_has_content(&self, row: usize, start: usize, end: usize) -> bool {
        if row >= self.rows || start > end {
            return false;
        }
        let end = end.min(self.cols.saturating_sub(1));
        (start..=end).any(|c| self.get(row, c).is_some())
    }

    /// Write `text` one character per cell starting at (row, col), clipping at the row end.
    pub fn write_str(&mut self, row: usize, col: usize, text: &str) {
        for (i, ch) in text.chars().enumerate() {
            self.set_char(row, col + i, ch);
        }
    }

    /// Row contents as text (empty cells as spaces, trailing blanks trimmed).
    pub fn row_text(&self, row: usize) -> String {
        let mut s: String = (0..self.cols)
            .map(|c| self.get(row, c).unwrap_or(' '))
            .collect();
        s.truncate(s.trim_end().len());
        s
    }

    /// Empty every cell and drop all metadata.
    pub fn clear_all(&mut self) {
        self.cells.fill(Cell::default());
    }
}
