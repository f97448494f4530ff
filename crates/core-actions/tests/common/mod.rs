#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_actions::{Action, DispatchResult, Key, Worksheet, dispatch};
use core_grid::Position;
use core_render::GridRenderer;
use std::path::PathBuf;

/// Scenario step: either feed literal keys or invoke a direct action.
#[derive(Debug, Clone)]
pub enum Step<'a> {
    /// Digits and operator glyphs as typed; `\n` is Enter, `\u{8}` is Backspace.
    Keys(&'a str),
    Action(Action),
}

/// Renderer that remembers the highlight and counts notifications.
#[derive(Debug, Default)]
pub struct TrackingRenderer {
    pub cursor: Option<(usize, usize)>,
    pub highlight: Option<(usize, usize, usize, usize)>,
    pub cell_updates: usize,
    pub removed_underlines: Vec<(usize, usize, usize)>,
}

impl GridRenderer for TrackingRenderer {
    fn update_cell(&mut self, _row: usize, _col: usize) {
        self.cell_updates += 1;
    }
    fn update_cursor(&mut self, row: usize, col: usize) {
        self.cursor = Some((row, col));
    }
    fn remove_underline(&mut self, row: usize, start_col: usize, end_col: usize) {
        self.removed_underlines.push((row, start_col, end_col));
    }
    fn highlight_box(&mut self, top_row: usize, bottom_row: usize, start_col: usize, end_col: usize) {
        self.highlight = Some((top_row, bottom_row, start_col, end_col));
    }
    fn clear_highlight(&mut self) {
        self.highlight = None;
    }
}

pub struct Harness {
    pub sheet: Worksheet,
    pub renderer: TrackingRenderer,
}

impl Harness {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_save_path(rows, cols, PathBuf::from("worksheet.json"))
    }

    pub fn with_save_path(rows: usize, cols: usize, save_path: PathBuf) -> Self {
        Self {
            sheet: Worksheet::new(rows, cols, save_path),
            renderer: TrackingRenderer::default(),
        }
    }

    pub fn run(&mut self, steps: &[Step<'_>]) -> DispatchResult {
        let mut last = DispatchResult::clean();
        for step in steps {
            match step {
                Step::Keys(seq) => {
                    for ch in seq.chars() {
                        let key = match ch {
                            '\n' => Key::Enter,
                            '\u{8}' => Key::Backspace,
                            other => Key::from_char(other).expect("scenario key"),
                        };
                        last = dispatch(Action::Key(key), &mut self.sheet, &mut self.renderer);
                    }
                }
                Step::Action(action) => {
                    last = dispatch(action.clone(), &mut self.sheet, &mut self.renderer);
                }
            }
        }
        last
    }

    pub fn keys(&mut self, seq: &str) -> DispatchResult {
        self.run(&[Step::Keys(seq)])
    }

    pub fn act(&mut self, action: Action) -> DispatchResult {
        self.run(&[Step::Action(action)])
    }

    pub fn goto(&mut self, row: usize, col: usize) -> DispatchResult {
        self.act(Action::MoveTo(Position::new(row, col)))
    }

    pub fn rows(&self, range: std::ops::Range<usize>) -> Vec<String> {
        range.map(|r| self.sheet.grid().row_text(r)).collect()
    }

    pub fn cursor(&self) -> (usize, usize) {
        let c = self.sheet.cursor();
        (c.row, c.col)
    }
}
