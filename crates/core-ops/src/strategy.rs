//! Dispatch from operator kind to its layout routine, plus the grid mutation
//! helpers those routines share. Every write goes through `FormatContext` so
//! the attached renderer hears about it.

use crate::FormatError;
use crate::column::{self, ColumnOp};
use crate::division::{self, DivisionLayout};
use crate::multiplication;
use crate::operand::OperatorKind;
use crate::range::{ActiveOperation, EntryLayout, ResultRange};
use core_grid::{CellFlags, Grid};
use core_render::GridRenderer;

pub(crate) struct FormatContext<'a> {
    pub grid: &'a mut Grid,
    pub renderer: &'a mut dyn GridRenderer,
    /// Ranges already registered; consulted for collisions only.
    pub ranges: &'a [ResultRange],
}

pub(crate) enum Formatted {
    Entry(EntryLayout),
    Division(DivisionLayout),
}

impl OperatorKind {
    pub(crate) fn format(self, ctx: &mut FormatContext<'_>, active: &ActiveOperation) -> Result<Formatted, FormatError> {
        match self {
            OperatorKind::Addition => column::format_column(ctx, active, ColumnOp::Add),
            OperatorKind::Subtraction => column::format_column(ctx, active, ColumnOp::Sub),
            OperatorKind::Multiplication => multiplication::format_multiplication(ctx, active),
            OperatorKind::Division => division::format_division(ctx, active),
        }
    }
}

impl FormatContext<'_> {
    pub fn put(&mut self, row: usize, col: usize, ch: char) {
        self.grid.set_char(row, col, ch);
        self.renderer.update_cell(row, col);
    }

    pub fn erase(&mut self, row: usize, col: usize) {
        if self.grid.get(row, col).is_some() {
            self.grid.clear_cell(row, col);
            self.renderer.update_cell(row, col);
        }
    }

    pub fn erase_span(&mut self, row: usize, start: usize, end: usize) {
        for col in start..=end {
            self.erase(row, col);
        }
    }

    /// Move the characters in `[start, end]` of `row` right by `by` columns.
    pub fn slide_right(&mut self, row: usize, start: usize, end: usize, by: usize) {
        for col in (start..=end).rev() {
            let ch = self.grid.get(row, col);
            self.erase(row, col);
            if let Some(ch) = ch {
                self.put(row, col + by, ch);
            }
        }
    }

    pub fn underline(&mut self, row: usize, start: usize, end: usize) {
        for col in start..=end {
            self.grid.insert_flags(row, col, CellFlags::UNDERLINE);
        }
        self.renderer.add_underline(row, start, end);
    }
}
