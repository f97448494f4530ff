//! Crossterm event -> `Action` translation.
//!
//! Stateless: every worksheet key maps to exactly one action. Control chords
//! are checked before plain characters so `Ctrl+S` never types an `s`.
//! Characters that are neither digits nor operator glyphs are dropped.

use crate::{Action, Key};
use core_render::TerminalRenderer;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

pub fn translate_key(key: &KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('s') | KeyCode::Char('S') => Some(Action::Save),
            KeyCode::Char('l') | KeyCode::Char('L') => Some(Action::ClearWorksheet),
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Quit),
            _ => None,
        };
    }
    let key = match key.code {
        KeyCode::Char(ch) => Key::from_char(ch)?,
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Esc => return Some(Action::Quit),
        _ => return None,
    };
    Some(Action::Key(key))
}

/// Left clicks move the cursor to the clicked cell.
pub fn translate_mouse(event: &MouseEvent) -> Option<Action> {
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Action::MoveTo(TerminalRenderer::cell_at_screen(
            event.column,
            event.row,
        ))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_grid::Position;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn digits_and_operators() {
        assert_eq!(
            translate_key(&press(KeyCode::Char('4'), KeyModifiers::NONE)),
            Some(Action::Key(Key::Digit('4')))
        );
        assert_eq!(
            translate_key(&press(KeyCode::Char('*'), KeyModifiers::SHIFT)),
            Some(Action::Key(Key::Operator('*')))
        );
        assert_eq!(translate_key(&press(KeyCode::Char('q'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn control_chords() {
        assert_eq!(
            translate_key(&press(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            Some(Action::Save)
        );
        assert_eq!(
            translate_key(&press(KeyCode::Char('l'), KeyModifiers::CONTROL)),
            Some(Action::ClearWorksheet)
        );
        assert_eq!(
            translate_key(&press(KeyCode::Char('q'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
        assert_eq!(translate_key(&press(KeyCode::Char('x'), KeyModifiers::CONTROL)), None);
    }

    #[test]
    fn navigation_keys() {
        assert_eq!(
            translate_key(&press(KeyCode::Backspace, KeyModifiers::NONE)),
            Some(Action::Key(Key::Backspace))
        );
        assert_eq!(
            translate_key(&press(KeyCode::Up, KeyModifiers::NONE)),
            Some(Action::Key(Key::Up))
        );
        assert_eq!(translate_key(&press(KeyCode::Esc, KeyModifiers::NONE)), Some(Action::Quit));
    }

    #[test]
    fn left_click_maps_to_cell() {
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 7,
            row: 2,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(translate_mouse(&click), Some(Action::MoveTo(Position::new(2, 3))));
        let drag = MouseEvent {
            kind: MouseEventKind::Moved,
            ..click
        };
        assert_eq!(translate_mouse(&drag), None);
    }
}
