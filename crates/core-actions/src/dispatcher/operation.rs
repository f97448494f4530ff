//! Enter: lay out the pending operation.

use super::DispatchResult;
use crate::Worksheet;
use core_render::GridRenderer;

pub(crate) fn handle_enter(sheet: &mut Worksheet, renderer: &mut dyn GridRenderer) -> DispatchResult {
    let Some(active) = sheet.registry.active_operation().copied() else {
        return DispatchResult::clean();
    };
    match sheet.registry.format_active_operation(&mut sheet.grid, renderer) {
        Some(layout) => {
            sheet.dirty = true;
            sheet.set_cursor(layout.cursor(), renderer);
            tracing::debug!(target: "actions.dispatch", symbol = %active.symbol, row = active.row, col = active.anchor_col, "operation_laid_out");
            DispatchResult::dirty()
        }
        None => {
            sheet.set_message(format!("cannot lay out {}", active.symbol));
            DispatchResult::dirty()
        }
    }
}
