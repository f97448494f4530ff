mod common;

use common::{Sheet, expect_entry};
use core_grid::CellFlags;
use core_ops::{RangeKind, UnderlineSpan, Verdict};
use pretty_assertions::assert_eq;

fn formatted() -> (Sheet, core_ops::EntryLayout) {
    let mut s = Sheet::new(12, 12);
    let layout = expect_entry(s.type_expr(0, 1, "123*45").enter());
    (s, layout)
}

#[test]
fn operator_becomes_a_dot_and_operands_stay() {
    let (s, layout) = formatted();
    assert_eq!(s.grid.row_text(0), " 123·45");
    for col in 1..=6 {
        assert!(s.grid.flags(0, col).contains(CellFlags::UNDERLINE));
    }
    let b = layout.box_range;
    assert_eq!((b.top_row, b.operator_row, b.result_row), (0, 0, 3));
    assert_eq!((b.start_col, b.end_col), (0, 6));
    assert_eq!(
        b.second_underline,
        Some(UnderlineSpan {
            row: 2,
            start_col: 2,
            end_col: 6
        })
    );
    assert!(s.grid.flags(2, 2).contains(CellFlags::UNDERLINE));
}

#[test]
fn one_partial_per_digit_then_final() {
    let (_, layout) = formatted();
    let first = &layout.first;
    assert_eq!((first.row, first.kind, first.expected_digits.as_str()), (1, RangeKind::Partial, "615"));
    assert_eq!(first.check_zone(), (4, 6));
    assert_eq!(first.entry_col, Some(6));

    let rest: Vec<_> = layout
        .pending
        .iter()
        .map(|r| (r.row, r.kind, r.expected_digits.as_str(), r.check_zone()))
        .collect();
    assert_eq!(
        rest,
        vec![
            (2, RangeKind::Partial, "4920", (3, 6)),
            (3, RangeKind::Final, "5535", (3, 6)),
        ]
    );
}

#[test]
fn partial_mismatch_is_lenient() {
    let (mut s, _) = formatted();
    let steps = s.digits("111");
    assert_eq!(steps[2].verdict(), Some(Verdict::Retry));
    for col in 4..=6 {
        assert!(!s.grid.flags(1, col).intersects(CellFlags::COLORING));
    }
    assert!(s.registry.active_entry().is_some());

    s.registry.update_cursor_context(1, 6);
    let steps = s.digits("516");
    assert_eq!(steps[2].verdict(), Some(Verdict::Correct));
    assert_eq!(s.grid.row_text(1), "    615");
    assert!(s.grid.is_locked(1, 4));
}

#[test]
fn final_mismatch_is_flagged() {
    let (mut s, _) = formatted();
    // leave the first partial, then resume on the final row
    s.registry.update_cursor_context(3, 6);
    assert!(s.registry.active_entry().is_none());
    assert!(s.registry.try_resume_at(3, 6));
    let steps = s.digits("0000");
    assert_eq!(steps[3].verdict(), Some(Verdict::Wrong));
    assert!(s.grid.flags(3, 3).contains(CellFlags::WRONG));
}

#[test]
fn every_row_is_registered() {
    let (s, _) = formatted();
    let rows: Vec<usize> = s.registry.ranges().iter().map(|r| r.row).collect();
    assert_eq!(rows, vec![1, 2, 3]);
    assert_eq!(s.registry.pending_ranges().count(), 3);
}

#[test]
fn shifted_multiplication_keeps_its_operand_row() {
    let mut s = Sheet::new(12, 12);
    s.grid.set_char(2, 3, '8');
    let layout = expect_entry(s.type_expr(0, 1, "12x3").enter());
    let b = layout.box_range;
    assert_eq!((b.top_row, b.body_row, b.result_row), (0, 4, 5));
    assert_eq!(s.grid.row_text(0), " 12·3");
    assert!(s.grid.flags(0, 1).contains(CellFlags::UNDERLINE));
    assert_eq!(s.grid.row_text(2), "   8");
    assert_eq!(layout.first.row, 4);
    assert_eq!(layout.pending.last().map(|r| r.row), Some(5));
}
