//! Worksheet-level commands: save and clear.

use super::DispatchResult;
use crate::Worksheet;
use crate::io_ops::write_file;
use core_render::GridRenderer;

pub(crate) fn handle_save(sheet: &mut Worksheet) -> DispatchResult {
    let path = sheet.save_path().to_path_buf();
    match write_file(&sheet.grid, &path) {
        Ok(()) => {
            sheet.set_message(format!("saved {}", path.display()));
            sheet.mark_saved(path);
        }
        Err(e) => {
            tracing::error!(target: "io", path = %path.display(), error = %format!("{e:#}"), "worksheet_save_error");
            sheet.set_message("save failed");
        }
    }
    DispatchResult::dirty()
}

pub(crate) fn handle_clear(sheet: &mut Worksheet, renderer: &mut dyn GridRenderer) -> DispatchResult {
    sheet.clear(renderer);
    tracing::debug!(target: "actions.dispatch", "worksheet_cleared");
    DispatchResult::grid_replaced()
}
