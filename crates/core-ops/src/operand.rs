//! Operator symbols and the digit-run scanner shared by every operation.

use crate::FormatError;
use core_grid::Grid;

/// Glyph that replaces a typed multiplication operator once formatted.
pub const MULTIPLICATION_DOT: char = '·';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Addition,
    Subtraction,
    Multiplication,
    Division,
}

impl OperatorKind {
    /// Map a typed glyph to its operation. Several glyphs alias one kind.
    pub fn from_symbol(ch: char) -> Option<Self> {
        match ch {
            '+' => Some(Self::Addition),
            '-' => Some(Self::Subtraction),
            '*' | 'x' | 'X' | '×' | MULTIPLICATION_DOT => Some(Self::Multiplication),
            '/' | ':' => Some(Self::Division),
            _ => None,
        }
    }

    pub fn symbols(self) -> &'static [char] {
        match self {
            Self::Addition => &['+'],
            Self::Subtraction => &['-'],
            Self::Multiplication => &['*', 'x', 'X', '×', MULTIPLICATION_DOT],
            Self::Division => &['/', ':'],
        }
    }

    pub fn accepts(self, ch: char) -> bool {
        self.symbols().contains(&ch)
    }

    pub fn is_operator_symbol(ch: char) -> bool {
        Self::from_symbol(ch).is_some()
    }
}

/// A run of digits on one row with its inclusive column span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operand {
    pub digits: String,
    pub start: usize,
    pub end: usize,
}

impl Operand {
    /// Number of columns (and digits) the operand occupies.
    pub fn width(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn value(&self) -> Result<u128, FormatError> {
        self.digits.parse().map_err(|_| FormatError::Overflow)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperandPair {
    pub left: Operand,
    pub right: Operand,
}

/// Scan the digit runs immediately left and right of `anchor` on `row`.
///
/// Returns `None` when the anchor is outside the grid, the anchor glyph is not
/// one of `kind`'s symbols, or either side has no digits.
pub fn parse_around(grid: &Grid, row: usize, anchor: usize, kind: OperatorKind) -> Option<OperandPair> {
    let symbol = grid.get(row, anchor)?;
    if !kind.accepts(symbol) {
        return None;
    }

    let mut a_start = anchor;
    while a_start > 0 && grid.is_digit(row, a_start - 1) {
        a_start -= 1;
    }
    if a_start == anchor {
        return None;
    }

    let mut b_end = anchor;
    while grid.is_digit(row, b_end + 1) {
        b_end += 1;
    }
    if b_end == anchor {
        return None;
    }

    Some(OperandPair {
        left: collect(grid, row, a_start, anchor - 1),
        right: collect(grid, row, anchor + 1, b_end),
    })
}

fn collect(grid: &Grid, row: usize, start: usize, end: usize) -> Operand {
    Operand {
        digits: (start..=end).filter_map(|c| grid.get(row, c)).collect(),
        start,
        end,
    }
}
