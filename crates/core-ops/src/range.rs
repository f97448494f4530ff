//! Result rows, their enclosing boxes, and the pending operation record.

use crate::operand::OperatorKind;
use core_grid::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeKind {
    /// Single result row of an addition or subtraction.
    Plain,
    /// One partial product row of a multiplication.
    Partial,
    /// The final product row of a multiplication.
    Final,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnderlineSpan {
    pub row: usize,
    pub start_col: usize,
    pub end_col: usize,
}

/// Rows and columns owned by one formatted operation. All spans inclusive.
///
/// The top row is the typed row. The body (operator or partial rows down to
/// the result row) starts at `body_row`, which is `top_row + 1` unless the
/// layout was pushed down; rows in between belong to whatever was there.
///
/// Two boxes are the same box when every field matches; deletion relies on
/// this to find every result range that belongs to a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxRange {
    pub top_row: usize,
    pub body_row: usize,
    pub operator_row: usize,
    pub result_row: usize,
    pub start_col: usize,
    pub end_col: usize,
    /// Underline above a multiplication's final row.
    pub second_underline: Option<UnderlineSpan>,
}

impl BoxRange {
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.covers_row(row) && (self.start_col..=self.end_col).contains(&col)
    }

    pub fn covers_row(&self, row: usize) -> bool {
        row == self.top_row || (self.body_row..=self.result_row).contains(&row)
    }

    /// Every row the box owns, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = usize> {
        std::iter::once(self.top_row).chain(self.body_row..=self.result_row)
    }

    pub fn overlaps_cols(&self, start: usize, end: usize) -> bool {
        start <= self.end_col && self.start_col <= end
    }
}

/// One row where the user types an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRange {
    pub row: usize,
    pub start_col: usize,
    pub end_col: usize,
    /// Correct answer without padding.
    pub expected_digits: String,
    /// Column of the answer's leftmost digit when right-aligned to the check end.
    pub expected_start_col: usize,
    pub check_start_col: Option<usize>,
    pub check_end_col: Option<usize>,
    /// Column where entry begins; `end_col` when unset.
    pub entry_col: Option<usize>,
    pub kind: RangeKind,
    pub locked: bool,
    pub box_range: BoxRange,
}

impl ResultRange {
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row == self.row && (self.start_col..=self.end_col).contains(&col)
    }

    /// Inclusive columns compared against the expected answer.
    pub fn check_zone(&self) -> (usize, usize) {
        (
            self.check_start_col.unwrap_or(self.start_col),
            self.check_end_col.unwrap_or(self.end_col),
        )
    }

    /// Expected answer padded on the left with blanks to the zone width.
    pub fn expected_in_zone(&self) -> String {
        let (start, end) = self.check_zone();
        let width = end + 1 - start;
        format!("{:>width$}", self.expected_digits)
    }

    pub fn initial_entry_col(&self) -> usize {
        self.entry_col.unwrap_or(self.end_col)
    }

    pub fn entry_position(&self) -> Position {
        Position::new(self.row, self.initial_entry_col())
    }

    /// Ranges occupying the same row span are the same slot.
    pub(crate) fn same_slot(&self, other: &ResultRange) -> bool {
        self.row == other.row && self.start_col == other.start_col && self.end_col == other.end_col
    }
}

/// Operator typed but not yet formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveOperation {
    pub kind: OperatorKind,
    pub symbol: char,
    pub row: usize,
    pub anchor_col: usize,
}

/// Layout produced for addition, subtraction and multiplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryLayout {
    /// Range the cursor lands on.
    pub first: ResultRange,
    /// Further ranges of the same box, top to bottom.
    pub pending: Vec<ResultRange>,
    pub box_range: BoxRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutResult {
    Entry(EntryLayout),
    /// Division: no result ranges, just a cursor jump.
    Jump { cursor: Position },
}

impl LayoutResult {
    pub fn cursor(&self) -> Position {
        match self {
            LayoutResult::Entry(layout) => layout.first.entry_position(),
            LayoutResult::Jump { cursor } => *cursor,
        }
    }

    pub fn ranges(&self) -> impl Iterator<Item = &ResultRange> {
        let (first, rest): (Option<&ResultRange>, &[ResultRange]) = match self {
            LayoutResult::Entry(layout) => (Some(&layout.first), &layout.pending),
            LayoutResult::Jump { .. } => (None, &[]),
        };
        first.into_iter().chain(rest.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed() -> BoxRange {
        BoxRange {
            top_row: 2,
            body_row: 3,
            operator_row: 3,
            result_row: 4,
            start_col: 1,
            end_col: 3,
            second_underline: None,
        }
    }

    fn range(digits: &str, check: Option<(usize, usize)>) -> ResultRange {
        ResultRange {
            row: 4,
            start_col: 1,
            end_col: 3,
            expected_digits: digits.to_string(),
            expected_start_col: 4 - digits.len(),
            check_start_col: check.map(|c| c.0),
            check_end_col: check.map(|c| c.1),
            entry_col: None,
            kind: RangeKind::Plain,
            locked: false,
            box_range: boxed(),
        }
    }

    #[test]
    fn zone_defaults_to_full_range() {
        let r = range("42", None);
        assert_eq!(r.check_zone(), (1, 3));
        assert_eq!(r.expected_in_zone(), " 42");
        assert_eq!(r.entry_position(), Position::new(4, 3));
    }

    #[test]
    fn explicit_zone_is_tight() {
        let r = range("42", Some((2, 3)));
        assert_eq!(r.expected_in_zone(), "42");
    }

    #[test]
    fn box_bounds_are_inclusive() {
        let b = boxed();
        assert!(b.contains(2, 1) && b.contains(4, 3));
        assert!(!b.contains(5, 1) && !b.contains(3, 0));
        assert!(b.overlaps_cols(3, 9) && !b.overlaps_cols(4, 9));
    }

    #[test]
    fn pushed_down_box_skips_the_gap_rows() {
        let b = BoxRange {
            top_row: 0,
            body_row: 4,
            operator_row: 4,
            result_row: 5,
            ..boxed()
        };
        assert_eq!(b.rows().collect::<Vec<_>>(), vec![0, 4, 5]);
        assert!(b.contains(0, 2) && b.contains(4, 2));
        assert!(!b.contains(1, 2) && !b.covers_row(3));
        assert_eq!(boxed().rows().collect::<Vec<_>>(), vec![2, 3, 4]);
    }
}
