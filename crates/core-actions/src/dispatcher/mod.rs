//! Dispatcher applying `Action` to a worksheet.
//!
//! Decomposed into focused sub-modules:
//! * `motion`    - cursor movement and mouse placement
//! * `edit`      - digits, operator glyphs and backspace
//! * `operation` - Enter: formatting the pending operation
//! * `command`   - save / clear / quit
//!
//! Every handler receives the renderer so grid and cursor changes are
//! reported as they happen. The returned `DispatchResult` only tells the
//! runtime whether to repaint, repaint everything, or exit.

use crate::{Action, Key, Worksheet};
use core_render::GridRenderer;

mod command;
mod edit;
mod motion;
mod operation;

/// Result of dispatching a single `Action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    pub dirty: bool,
    pub quit: bool,
    /// The whole grid changed (cleared or reloaded); partial repaint state is stale.
    pub grid_replaced: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            quit: false,
            grid_replaced: false,
        }
    }
    pub fn clean() -> Self {
        Self {
            dirty: false,
            quit: false,
            grid_replaced: false,
        }
    }
    pub fn quit() -> Self {
        Self {
            dirty: true,
            quit: true,
            grid_replaced: false,
        }
    }
    pub fn grid_replaced() -> Self {
        Self {
            dirty: true,
            quit: false,
            grid_replaced: true,
        }
    }
}

/// Apply an action. Any ephemeral status message from the previous action is
/// dropped first.
pub fn dispatch(action: Action, sheet: &mut Worksheet, renderer: &mut dyn GridRenderer) -> DispatchResult {
    let had_message = sheet.message().is_some();
    sheet.clear_message();
    let result = match action {
        Action::Key(Key::Digit(d)) => edit::handle_digit(d, sheet, renderer),
        Action::Key(Key::Operator(op)) => edit::handle_operator(op, sheet, renderer),
        Action::Key(Key::Backspace) => edit::handle_backspace(sheet, renderer),
        Action::Key(Key::Enter) => operation::handle_enter(sheet, renderer),
        Action::Key(key @ (Key::Left | Key::Right | Key::Up | Key::Down)) => {
            motion::handle_motion(key, sheet, renderer)
        }
        Action::MoveTo(pos) => motion::move_to(pos, sheet, renderer),
        Action::Save => command::handle_save(sheet),
        Action::ClearWorksheet => command::handle_clear(sheet, renderer),
        Action::Quit => DispatchResult::quit(),
    };
    if had_message && !result.dirty {
        // the status line still shows the old message
        return DispatchResult::dirty();
    }
    result
}
