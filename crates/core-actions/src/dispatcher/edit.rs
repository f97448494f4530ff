//! Digit, operator and backspace handling.
//!
//! Digits are offered to the registry in a fixed order before they are typed
//! as plain text:
//! 1. a division work area that claims the cell (writes + jumps),
//! 2. the active result entry (writes right to left + checks),
//! 3. otherwise the cell is written and the cursor advances, unless locked.
//!
//! Backspace mirrors that: the active entry first, then whole-box deletion
//! inside a locked box, then plain erase.

use super::DispatchResult;
use crate::Worksheet;
use core_grid::Position;
use core_ops::{EntryStep, Verdict};
use core_render::GridRenderer;

pub(crate) fn handle_digit(digit: char, sheet: &mut Worksheet, renderer: &mut dyn GridRenderer) -> DispatchResult {
    let cursor = sheet.cursor();
    if let Some(target) = sheet
        .registry
        .handle_division_digit(&mut sheet.grid, renderer, cursor, digit)
    {
        sheet.dirty = true;
        sheet.set_cursor(target, renderer);
        return DispatchResult::dirty();
    }

    let step = sheet.registry.handle_result_digit(&mut sheet.grid, renderer, digit);
    if let Some(next) = step.cursor() {
        sheet.dirty = true;
        match step.verdict() {
            Some(Verdict::Correct) => sheet.set_message("correct"),
            Some(Verdict::Wrong) => sheet.set_message("wrong"),
            Some(Verdict::Retry) => sheet.set_message("try again"),
            None => {}
        }
        sheet.set_cursor(next, renderer);
        return DispatchResult::dirty();
    }

    if sheet.grid.is_locked(cursor.row, cursor.col) {
        tracing::trace!(target: "actions.dispatch", row = cursor.row, col = cursor.col, "locked_cell_rejected");
        return DispatchResult::clean();
    }
    write_and_advance(digit, sheet, renderer);
    DispatchResult::dirty()
}

pub(crate) fn handle_operator(symbol: char, sheet: &mut Worksheet, renderer: &mut dyn GridRenderer) -> DispatchResult {
    let cursor = sheet.cursor();
    if sheet.grid.is_locked(cursor.row, cursor.col) {
        return DispatchResult::clean();
    }
    write_and_advance(symbol, sheet, renderer);
    sheet.registry.begin_operation(symbol, cursor.row, cursor.col);
    DispatchResult::dirty()
}

fn write_and_advance(ch: char, sheet: &mut Worksheet, renderer: &mut dyn GridRenderer) {
    let cursor = sheet.cursor();
    sheet.grid.set_char(cursor.row, cursor.col, ch);
    renderer.update_cell(cursor.row, cursor.col);
    sheet.dirty = true;
    tracing::trace!(target: "actions.dispatch", op = "type", %ch, row = cursor.row, col = cursor.col, "edit");
    let next = if cursor.col + 1 < sheet.grid.cols() {
        Position::new(cursor.row, cursor.col + 1)
    } else if cursor.row + 1 < sheet.grid.rows() {
        Position::new(cursor.row + 1, 0)
    } else {
        cursor
    };
    sheet.set_cursor(next, renderer);
}

pub(crate) fn handle_backspace(sheet: &mut Worksheet, renderer: &mut dyn GridRenderer) -> DispatchResult {
    let step = sheet.registry.handle_result_backspace(&mut sheet.grid, renderer);
    if let EntryStep::Erased { cursor } = step {
        sheet.dirty = true;
        sheet.set_cursor(cursor, renderer);
        return DispatchResult::dirty();
    }

    let cursor = sheet.cursor();
    if let Some(box_range) = sheet.registry.locked_box_at(cursor.row, cursor.col) {
        sheet
            .registry
            .remove_box_range(&mut sheet.grid, renderer, &box_range);
        sheet.dirty = true;
        sheet.set_message("box deleted");
        return DispatchResult::dirty();
    }

    if sheet.grid.get(cursor.row, cursor.col).is_some() {
        erase(sheet, renderer, cursor);
        return DispatchResult::dirty();
    }
    let prev = if cursor.col > 0 {
        Position::new(cursor.row, cursor.col - 1)
    } else if cursor.row > 0 {
        Position::new(cursor.row - 1, sheet.grid.cols() - 1)
    } else {
        return DispatchResult::clean();
    };
    sheet.set_cursor(prev, renderer);
    erase(sheet, renderer, prev);
    DispatchResult::dirty()
}

fn erase(sheet: &mut Worksheet, renderer: &mut dyn GridRenderer, at: Position) {
    if sheet.grid.is_locked(at.row, at.col) || sheet.grid.get(at.row, at.col).is_none() {
        return;
    }
    sheet.grid.clear_cell(at.row, at.col);
    renderer.update_cell(at.row, at.col);
    sheet.dirty = true;
    tracing::trace!(target: "actions.dispatch", op = "erase", row = at.row, col = at.col, "edit");
}
