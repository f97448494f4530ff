#![allow(dead_code)]

use core_grid::Grid;
use core_ops::{EntryStep, LayoutResult, OperationRegistry};
use core_render::GridRenderer;

/// Renderer that records every notification for later assertions.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub cells: Vec<(usize, usize)>,
    pub cursor: Option<(usize, usize)>,
    pub underlines: Vec<(usize, usize, usize)>,
    pub removed_underlines: Vec<(usize, usize, usize)>,
    pub highlights: Vec<(usize, usize, usize, usize)>,
    pub cleared_highlights: usize,
}

impl GridRenderer for RecordingRenderer {
    fn update_cell(&mut self, row: usize, col: usize) {
        self.cells.push((row, col));
    }
    fn update_cursor(&mut self, row: usize, col: usize) {
        self.cursor = Some((row, col));
    }
    fn add_underline(&mut self, row: usize, start_col: usize, end_col: usize) {
        self.underlines.push((row, start_col, end_col));
    }
    fn remove_underline(&mut self, row: usize, start_col: usize, end_col: usize) {
        self.removed_underlines.push((row, start_col, end_col));
    }
    fn highlight_box(&mut self, top_row: usize, bottom_row: usize, start_col: usize, end_col: usize) {
        self.highlights.push((top_row, bottom_row, start_col, end_col));
    }
    fn clear_highlight(&mut self) {
        self.cleared_highlights += 1;
    }
}

/// A worksheet with an expression typed at (row, col) and its operator
/// registered, ready for Enter.
pub struct Sheet {
    pub grid: Grid,
    pub registry: OperationRegistry,
    pub renderer: RecordingRenderer,
}

impl Sheet {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            grid: Grid::new(rows, cols),
            registry: OperationRegistry::new(),
            renderer: RecordingRenderer::default(),
        }
    }

    /// Write `expr` at (row, col) and begin the operation at its first operator glyph.
    pub fn type_expr(&mut self, row: usize, col: usize, expr: &str) -> &mut Self {
        self.grid.write_str(row, col, expr);
        let (offset, symbol) = expr
            .chars()
            .enumerate()
            .find(|(_, ch)| !ch.is_ascii_digit())
            .expect("expression has an operator");
        assert!(self.registry.begin_operation(symbol, row, col + offset));
        self
    }

    pub fn enter(&mut self) -> Option<LayoutResult> {
        self.registry.format_active_operation(&mut self.grid, &mut self.renderer)
    }

    pub fn digits(&mut self, digits: &str) -> Vec<EntryStep> {
        digits
            .chars()
            .map(|d| self.registry.handle_result_digit(&mut self.grid, &mut self.renderer, d))
            .collect()
    }

    pub fn rows(&self, range: std::ops::Range<usize>) -> Vec<String> {
        range.map(|r| self.grid.row_text(r)).collect()
    }
}

pub fn expect_entry(layout: Option<LayoutResult>) -> core_ops::EntryLayout {
    match layout {
        Some(LayoutResult::Entry(layout)) => layout,
        other => panic!("expected an entry layout, got {other:?}"),
    }
}
