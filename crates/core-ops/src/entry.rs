//! Right-to-left answer entry on a single result range.

use crate::range::ResultRange;
use core_grid::{Grid, Position};

/// Range currently accepting digits, with the column the next digit lands on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEntry {
    pub range: ResultRange,
    pub cursor_col: usize,
}

impl ActiveEntry {
    pub fn new(range: ResultRange, cursor_col: usize) -> Self {
        Self { range, cursor_col }
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.range.contains(row, col)
    }

    pub fn cursor(&self) -> Position {
        Position::new(self.range.row, self.cursor_col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Matched; the zone is now locked.
    Correct,
    /// Mismatch, flagged wrong.
    Wrong,
    /// Mismatch on a partial product: coloring cleared, entry stays open.
    Retry,
}

/// Outcome of routing one key to the active entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStep {
    /// No entry, or the key fell outside it. The caller handles the key.
    Ignored,
    /// Digit placed; the zone is not full yet.
    Typed { cursor: Position },
    /// Digit placed and the full zone was compared.
    Checked { cursor: Position, verdict: Verdict },
    /// Digit removed by backspace.
    Erased { cursor: Position },
}

impl EntryStep {
    pub fn consumed(&self) -> bool {
        !matches!(self, EntryStep::Ignored)
    }

    pub fn cursor(&self) -> Option<Position> {
        match self {
            EntryStep::Ignored => None,
            EntryStep::Typed { cursor } | EntryStep::Checked { cursor, .. } | EntryStep::Erased { cursor } => {
                Some(*cursor)
            }
        }
    }

    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            EntryStep::Checked { verdict, .. } => Some(*verdict),
            _ => None,
        }
    }
}

/// Zone contents, or `None` while any zone cell is still empty.
pub(crate) fn filled_zone(grid: &Grid, row: usize, (start, end): (usize, usize)) -> Option<String> {
    (start..=end).map(|col| grid.get(row, col)).collect()
}
