//! Cursor movement.
//!
//! Arrow keys move one cell and stop at the grid edge. Clicks jump straight
//! to a cell. Both go through `Worksheet::set_cursor`, which keeps the
//! registry's entry state and box highlight in step with the cursor.

use super::DispatchResult;
use crate::{Key, Worksheet};
use core_grid::Position;
use core_render::GridRenderer;

pub(crate) fn handle_motion(key: Key, sheet: &mut Worksheet, renderer: &mut dyn GridRenderer) -> DispatchResult {
    let before = sheet.cursor();
    let target = match key {
        Key::Left => Position::new(before.row, before.col.saturating_sub(1)),
        Key::Right => Position::new(before.row, before.col + 1),
        Key::Up => Position::new(before.row.saturating_sub(1), before.col),
        Key::Down => Position::new(before.row + 1, before.col),
        _ => return DispatchResult::clean(),
    };
    move_to(target, sheet, renderer)
}

pub(crate) fn move_to(target: Position, sheet: &mut Worksheet, renderer: &mut dyn GridRenderer) -> DispatchResult {
    let before = sheet.cursor();
    sheet.set_cursor(target, renderer);
    let after = sheet.cursor();
    if before != after {
        tracing::trace!(target: "actions.dispatch", row = before.row, col = before.col, to_row = after.row, to_col = after.col, "motion");
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}
