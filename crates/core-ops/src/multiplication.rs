//! Long multiplication layout.
//!
//! ```text
//!   typed:   123*45      after:   123·45     <- underlined A·B
//!                                 ___615     <- partial: 123 x 5
//!                                 __4920     <- partial: 123 x 4, shifted one place
//!                                 __5535     <- final product
//! ```
//!
//! One partial product per digit of B, ones digit first, padded with trailing
//! zeros for its place value. Every row is right-aligned to B's last column.
//! The second underline sits under the last partial row. The operands never
//! leave the typed row; only the partial and product rows are pushed down.

use crate::FormatError;
use crate::operand::{MULTIPLICATION_DOT, OperatorKind, parse_around};
use crate::planner::{ColumnSpan, plan_shift};
use crate::range::{ActiveOperation, BoxRange, EntryLayout, RangeKind, ResultRange, UnderlineSpan};
use crate::strategy::{FormatContext, Formatted};
use std::iter;
use tracing::debug;

pub(crate) fn format_multiplication(
    ctx: &mut FormatContext<'_>,
    active: &ActiveOperation,
) -> Result<Formatted, FormatError> {
    let typed_row = active.row;
    let pair = parse_around(ctx.grid, typed_row, active.anchor_col, OperatorKind::Multiplication).ok_or(
        FormatError::MissingOperands {
            row: typed_row,
            col: active.anchor_col,
        },
    )?;
    let (a, b) = (&pair.left, &pair.right);
    let a_value = a.value()?;
    let partials = partial_products(a_value, &b.digits)?;
    let product = a_value.checked_mul(b.value()?).ok_or(FormatError::Overflow)?.to_string();

    let box_end = b.end;
    let box_start = a.start.saturating_sub(1);
    let box_width = box_end + 1 - box_start;
    if partials.iter().chain(iter::once(&product)).any(|p| p.len() > box_width) {
        return Err(FormatError::NoRoom);
    }

    let needed_rows = partials.len() + 2;
    let shift = plan_shift(
        ctx.grid,
        ctx.ranges,
        typed_row,
        needed_rows,
        ColumnSpan::new(box_start, box_end),
    )?;
    let first_partial_row = typed_row + 1 + shift;
    let last_partial_row = first_partial_row + partials.len() - 1;
    let final_row = last_partial_row + 1;

    let leftmost = partials
        .iter()
        .chain(iter::once(&product))
        .map(|p| box_end + 1 - p.len())
        .min()
        .unwrap_or(box_end);
    let second = UnderlineSpan {
        row: last_partial_row,
        start_col: leftmost.saturating_sub(1).max(box_start),
        end_col: box_end,
    };
    let box_range = BoxRange {
        top_row: typed_row,
        body_row: first_partial_row,
        operator_row: typed_row,
        result_row: final_row,
        start_col: box_start,
        end_col: box_end,
        second_underline: Some(second),
    };

    ctx.put(typed_row, active.anchor_col, MULTIPLICATION_DOT);
    ctx.underline(typed_row, a.start, b.end);

    let partial_count = partials.len();
    let mut ranges: Vec<ResultRange> = partials
        .into_iter()
        .enumerate()
        .map(|(i, digits)| row_range(first_partial_row + i, box_start, box_end, digits, RangeKind::Partial, box_range))
        .collect();
    for range in &ranges {
        ctx.erase_span(range.row, box_start, box_end);
    }
    ctx.underline(second.row, second.start_col, second.end_col);
    ctx.erase_span(final_row, box_start, box_end);
    ranges.push(row_range(final_row, box_start, box_end, product, RangeKind::Final, box_range));

    debug!(
        target: "ops.format",
        a = %a.digits,
        b = %b.digits,
        partials = partial_count,
        typed_row,
        shift,
        "multiplication_layout"
    );
    let first = ranges.remove(0);
    Ok(Formatted::Entry(EntryLayout {
        first,
        pending: ranges,
        box_range,
    }))
}

/// `a` times each digit of `b`, ones digit first, with place-value zeros appended.
pub fn partial_products(a: u128, b_digits: &str) -> Result<Vec<String>, FormatError> {
    b_digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(place, byte)| {
            let digit = u128::from(byte.wrapping_sub(b'0'));
            let product = a.checked_mul(digit).ok_or(FormatError::Overflow)?;
            Ok(format!("{product}{}", "0".repeat(place)))
        })
        .collect()
}

fn row_range(
    row: usize,
    start_col: usize,
    end_col: usize,
    digits: String,
    kind: RangeKind,
    box_range: BoxRange,
) -> ResultRange {
    let check_start = end_col + 1 - digits.len();
    ResultRange {
        row,
        start_col,
        end_col,
        expected_start_col: check_start,
        expected_digits: digits,
        check_start_col: Some(check_start),
        check_end_col: Some(end_col),
        entry_col: Some(end_col),
        kind,
        locked: false,
        box_range,
    }
}
