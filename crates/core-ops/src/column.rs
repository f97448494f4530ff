//! Column layout for addition and subtraction.
//!
//! ```text
//!   typed:   12+7        after:   12      <- top row (A)
//!                                 +7      <- operator row, underlined
//!                                 __      <- result row (entry, right to left)
//! ```
//!
//! Both operands are right-aligned on A's last column (the ones column). The
//! operator sits one column left of the wider operand. When the answer or B
//! is wider than the columns left of that ones column, A slides right along
//! the typed row until everything fits.

use crate::FormatError;
use crate::operand::{OperatorKind, parse_around};
use crate::planner::{ColumnSpan, plan_shift};
use crate::range::{ActiveOperation, BoxRange, EntryLayout, RangeKind, ResultRange};
use crate::strategy::{FormatContext, Formatted};
use tracing::debug;

/// Rows needed below the typed row: operator row and result row.
const ROWS_BELOW: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnOp {
    Add,
    Sub,
}

impl ColumnOp {
    fn kind(self) -> OperatorKind {
        match self {
            ColumnOp::Add => OperatorKind::Addition,
            ColumnOp::Sub => OperatorKind::Subtraction,
        }
    }

    fn apply(self, a: u128, b: u128) -> Result<u128, FormatError> {
        match self {
            ColumnOp::Add => a.checked_add(b).ok_or(FormatError::Overflow),
            ColumnOp::Sub => a.checked_sub(b).ok_or(FormatError::NegativeResult),
        }
    }
}

pub(crate) fn format_column(
    ctx: &mut FormatContext<'_>,
    active: &ActiveOperation,
    op: ColumnOp,
) -> Result<Formatted, FormatError> {
    let typed_row = active.row;
    let pair = parse_around(ctx.grid, typed_row, active.anchor_col, op.kind()).ok_or(
        FormatError::MissingOperands {
            row: typed_row,
            col: active.anchor_col,
        },
    )?;
    let (a, b) = (&pair.left, &pair.right);
    let answer = op.apply(a.value()?, b.value()?)?.to_string();

    let operand_width = a.width().max(b.width());
    let width = operand_width.max(answer.len());
    // Columns needed up to the ones column: the widest row plus a free cell
    // for the operator ahead of B.
    let room = width.max(b.width() + 1);
    let slide = room.saturating_sub(a.end + 1);
    let ones_col = a.end + slide;
    if !ctx.grid.in_bounds(typed_row, ones_col) {
        return Err(FormatError::NoRoom);
    }
    let a_start = a.start + slide;
    let b_start = ones_col + 1 - b.width();
    let op_col = a_start.min(b_start).saturating_sub(1);
    let underline_start = ones_col + 1 - operand_width;
    let result_start = ones_col + 1 - width;
    let span = ColumnSpan::new(op_col.min(result_start), ones_col);

    let shift = plan_shift(ctx.grid, ctx.ranges, typed_row, ROWS_BELOW, span)?;
    let operator_row = typed_row + 1 + shift;
    let result_row = operator_row + 1;

    // Nothing below fails; from here on the grid changes.
    ctx.erase(typed_row, active.anchor_col);
    ctx.erase_span(typed_row, b.start, b.end);
    if slide > 0 {
        ctx.slide_right(typed_row, a.start, a.end, slide);
    }
    ctx.erase_span(operator_row, span.start, span.end);
    ctx.put(operator_row, op_col, active.symbol);
    for (i, ch) in b.digits.chars().enumerate() {
        ctx.put(operator_row, b_start + i, ch);
    }
    ctx.underline(operator_row, underline_start, ones_col);

    let box_range = BoxRange {
        top_row: typed_row,
        body_row: operator_row,
        operator_row,
        result_row,
        start_col: span.start,
        end_col: ones_col,
        second_underline: None,
    };
    let expected_start_col = ones_col + 1 - answer.len();
    debug!(
        target: "ops.format",
        op = ?op,
        a = %a.digits,
        b = %b.digits,
        answer = %answer,
        typed_row,
        shift,
        slide,
        "column_layout"
    );
    let first = ResultRange {
        row: result_row,
        start_col: result_start,
        end_col: ones_col,
        expected_digits: answer,
        expected_start_col,
        check_start_col: Some(expected_start_col),
        check_end_col: Some(ones_col),
        entry_col: None,
        kind: RangeKind::Plain,
        locked: false,
        box_range,
    };
    Ok(Formatted::Entry(EntryLayout {
        first,
        pending: Vec::new(),
        box_range,
    }))
}
