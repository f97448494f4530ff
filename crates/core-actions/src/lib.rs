//! Editor actions for the longform worksheet.
//!
//! Input arrives as crossterm events, is translated into an [`Action`] by
//! `key_translator`, and applied to a [`Worksheet`] by [`dispatch`]. The
//! dispatcher consults the operation registry first (division jumps, result
//! entry, locked boxes) and falls back to plain grid typing.

pub mod dispatcher;
pub mod io_ops;
pub mod key_translator;
pub mod worksheet;

pub use dispatcher::{DispatchResult, dispatch};
pub use key_translator::{translate_key, translate_mouse};
pub use worksheet::Worksheet;

use core_grid::Position;

/// Logical worksheet keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(char),
    Operator(char),
    Enter,
    Backspace,
    Left,
    Right,
    Up,
    Down,
}

impl Key {
    /// Classify a typed character. Anything that is neither a digit nor an
    /// operator glyph yields `None`.
    pub fn from_char(ch: char) -> Option<Self> {
        if ch.is_ascii_digit() {
            Some(Key::Digit(ch))
        } else if core_ops::OperatorKind::is_operator_symbol(ch) {
            Some(Key::Operator(ch))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Key(Key),
    /// Move the cursor straight to a cell (mouse click).
    MoveTo(Position),
    Save,
    ClearWorksheet,
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_characters() {
        assert_eq!(Key::from_char('7'), Some(Key::Digit('7')));
        assert_eq!(Key::from_char('x'), Some(Key::Operator('x')));
        assert_eq!(Key::from_char(':'), Some(Key::Operator(':')));
        assert_eq!(Key::from_char('a'), None);
        assert_eq!(Key::from_char('='), None);
    }
}
