//! Vertical placement of a layout below its typed row.
//!
//! A layout needs `needed_rows` rows under the typed row across a column
//! span. If any of those rows holds content inside the span, or touches a
//! locked box, the rows below the typed row move down by `SHIFT_BLOCK_ROWS`
//! and the check repeats. The typed row itself never moves.

use crate::FormatError;
use crate::range::ResultRange;
use core_grid::Grid;
use tracing::trace;

pub const SHIFT_BLOCK_ROWS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpan {
    pub start: usize,
    pub end: usize,
}

impl ColumnSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Smallest shift (a multiple of `SHIFT_BLOCK_ROWS`) that leaves every row the
/// layout will occupy free. Fails with `NoRoom` once the layout would leave
/// the grid.
pub fn plan_shift(
    grid: &Grid,
    ranges: &[ResultRange],
    typed_row: usize,
    needed_rows: usize,
    span: ColumnSpan,
) -> Result<usize, FormatError> {
    let mut shift = 0;
    loop {
        let first = typed_row + shift + 1;
        let last = typed_row + shift + needed_rows;
        if last >= grid.rows() {
            trace!(target: "ops.layout", typed_row, shift, needed_rows, "no_room");
            return Err(FormatError::NoRoom);
        }
        match (first..=last).find(|row| row_blocked(grid, ranges, *row, span)) {
            None => {
                trace!(target: "ops.layout", typed_row, shift, "placed");
                return Ok(shift);
            }
            Some(row) => {
                trace!(target: "ops.layout", typed_row, shift, blocked_row = row, "shift");
                shift += SHIFT_BLOCK_ROWS;
            }
        }
    }
}

fn row_blocked(grid: &Grid, ranges: &[ResultRange], row: usize, span: ColumnSpan) -> bool {
    grid.row_has_content(row, span.start, span.end)
        || ranges.iter().any(|r| {
            r.locked && r.box_range.covers_row(row) && r.box_range.overlaps_cols(span.start, span.end)
        })
}
