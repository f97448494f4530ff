//! Coordinator between the editor and the operation engine.
//!
//! Owns the pending operator, the active entry, every declared result range
//! and the division jump table. The editor asks it what a keystroke means
//! before falling back to plain typing.

use crate::division::{DivisionJumpState, DivisionJumps, DivisionKey};
use crate::entry::{ActiveEntry, EntryStep, Verdict, filled_zone};
use crate::operand::OperatorKind;
use crate::range::{ActiveOperation, BoxRange, LayoutResult, RangeKind, ResultRange};
use crate::strategy::{FormatContext, Formatted};
use core_grid::{CellFlags, Grid, Position};
use core_render::GridRenderer;
use tracing::{debug, trace};

#[derive(Debug, Default)]
pub struct OperationRegistry {
    active: Option<ActiveOperation>,
    entry: Option<ActiveEntry>,
    ranges: Vec<ResultRange>,
    divisions: DivisionJumps,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_operation(&self) -> Option<&ActiveOperation> {
        self.active.as_ref()
    }

    pub fn active_entry(&self) -> Option<&ActiveEntry> {
        self.entry.as_ref()
    }

    pub fn ranges(&self) -> &[ResultRange] {
        &self.ranges
    }

    pub fn pending_ranges(&self) -> impl Iterator<Item = &ResultRange> {
        self.ranges.iter().filter(|r| !r.locked)
    }

    pub fn divisions(&self) -> &DivisionJumps {
        &self.divisions
    }

    /// Record an operator typed at (row, col). Any entry in progress ends.
    /// Returns false for glyphs that are not operators.
    pub fn begin_operation(&mut self, symbol: char, row: usize, col: usize) -> bool {
        let Some(kind) = OperatorKind::from_symbol(symbol) else {
            return false;
        };
        self.entry = None;
        self.active = Some(ActiveOperation {
            kind,
            symbol,
            row,
            anchor_col: col,
        });
        debug!(target: "ops.registry", ?kind, %symbol, row, col, "operation_begun");
        true
    }

    /// Lay out the pending operation. Consumes it either way; on failure the
    /// grid is untouched and `None` is returned.
    pub fn format_active_operation(
        &mut self,
        grid: &mut Grid,
        renderer: &mut dyn GridRenderer,
    ) -> Option<LayoutResult> {
        let active = self.active.take()?;
        self.entry = None;
        let mut ctx = FormatContext {
            grid,
            renderer,
            ranges: &self.ranges,
        };
        match active.kind.format(&mut ctx, &active) {
            Ok(Formatted::Entry(layout)) => {
                for range in std::iter::once(&layout.first).chain(&layout.pending) {
                    self.register(range.clone());
                }
                self.entry = Some(ActiveEntry::new(layout.first.clone(), layout.first.initial_entry_col()));
                debug!(
                    target: "ops.registry",
                    kind = ?active.kind,
                    ranges = 1 + layout.pending.len(),
                    top_row = layout.box_range.top_row,
                    "operation_formatted"
                );
                Some(LayoutResult::Entry(layout))
            }
            Ok(Formatted::Division(division)) => {
                let cursor = division.cursor;
                self.divisions.insert(division.key, division.state);
                debug!(target: "ops.registry", row = active.row, col = active.anchor_col, "division_registered");
                Some(LayoutResult::Jump { cursor })
            }
            Err(err) => {
                debug!(
                    target: "ops.format",
                    kind = ?active.kind,
                    row = active.row,
                    col = active.anchor_col,
                    %err,
                    "format_failed"
                );
                None
            }
        }
    }

    fn register(&mut self, range: ResultRange) {
        self.ranges.retain(|r| !r.same_slot(&range));
        self.ranges.push(range);
    }

    /// Route a digit typed at `pos` through the division jump table. Writes
    /// the digit and returns the jump target when a division claims the cell.
    pub fn handle_division_digit(
        &mut self,
        grid: &mut Grid,
        renderer: &mut dyn GridRenderer,
        pos: Position,
        digit: char,
    ) -> Option<Position> {
        if grid.is_locked(pos.row, pos.col) {
            return None;
        }
        let (key, state) = self.divisions.claim_mut(pos)?;
        grid.set_char(pos.row, pos.col, digit);
        renderer.update_cell(pos.row, pos.col);
        let phase = state.phase;
        let target = state.advance(pos);
        trace!(
            target: "ops.division",
            key_row = key.row,
            key_col = key.anchor_col,
            ?phase,
            step = state.current_step,
            to_row = target.row,
            to_col = target.col,
            "jump"
        );
        Some(target)
    }

    /// Type a digit into the active entry at its cursor column.
    pub fn handle_result_digit(&mut self, grid: &mut Grid, renderer: &mut dyn GridRenderer, digit: char) -> EntryStep {
        let Some((range, col)) = self.entry.as_ref().map(|e| (e.range.clone(), e.cursor_col)) else {
            return EntryStep::Ignored;
        };
        let row = range.row;
        if !range.contains(row, col) || grid.is_locked(row, col) {
            return EntryStep::Ignored;
        }

        clear_coloring(grid, renderer, row, range.start_col, range.end_col);
        grid.set_char(row, col, digit);
        renderer.update_cell(row, col);
        let next_col = col.saturating_sub(1).max(range.start_col);
        if let Some(entry) = self.entry.as_mut() {
            entry.cursor_col = next_col;
        }
        let cursor = Position::new(row, next_col);

        let zone = range.check_zone();
        let Some(typed) = filled_zone(grid, row, zone) else {
            trace!(target: "ops.entry", row, col, %digit, "digit");
            return EntryStep::Typed { cursor };
        };

        let verdict = if typed == range.expected_in_zone() {
            self.lock(grid, renderer, &range);
            self.entry = None;
            Verdict::Correct
        } else if range.kind == RangeKind::Partial {
            Verdict::Retry
        } else {
            for c in zone.0..=zone.1 {
                grid.insert_flags(row, c, CellFlags::WRONG);
                renderer.update_cell(row, c);
            }
            Verdict::Wrong
        };
        debug!(target: "ops.entry", row, %typed, expected = %range.expected_digits, ?verdict, "zone_checked");
        EntryStep::Checked { cursor, verdict }
    }

    fn lock(&mut self, grid: &mut Grid, renderer: &mut dyn GridRenderer, range: &ResultRange) {
        let (start, end) = range.check_zone();
        for col in range.start_col..=range.end_col {
            grid.insert_flags(range.row, col, CellFlags::LOCKED);
            if (start..=end).contains(&col) {
                grid.insert_flags(range.row, col, CellFlags::CORRECT);
            }
            renderer.update_cell(range.row, col);
        }
        if let Some(stored) = self.ranges.iter_mut().find(|r| r.same_slot(range)) {
            stored.locked = true;
        }
        debug!(target: "ops.entry", row = range.row, start = range.start_col, end = range.end_col, "result_locked");
    }

    /// Erase the digit under the entry cursor and step the cursor right.
    pub fn handle_result_backspace(&mut self, grid: &mut Grid, renderer: &mut dyn GridRenderer) -> EntryStep {
        let Some((range, col)) = self.entry.as_ref().map(|e| (e.range.clone(), e.cursor_col)) else {
            return EntryStep::Ignored;
        };
        let row = range.row;
        if grid.is_locked(row, col) {
            return EntryStep::Ignored;
        }
        grid.clear_cell(row, col);
        renderer.update_cell(row, col);
        clear_coloring(grid, renderer, row, range.start_col, range.end_col);
        let next_col = (col + 1).min(range.end_col);
        if let Some(entry) = self.entry.as_mut() {
            entry.cursor_col = next_col;
        }
        trace!(target: "ops.entry", row, col, "erase");
        EntryStep::Erased {
            cursor: Position::new(row, next_col),
        }
    }

    /// Re-enter a declared, unlocked range under the cursor. True when an
    /// entry is active afterwards.
    pub fn try_resume_at(&mut self, row: usize, col: usize) -> bool {
        if self.entry.is_some() {
            return true;
        }
        let Some(range) = self.ranges.iter().find(|r| !r.locked && r.contains(row, col)) else {
            return false;
        };
        trace!(target: "ops.entry", row, col, "entry_resumed");
        self.entry = Some(ActiveEntry::new(range.clone(), col));
        true
    }

    /// Follow the outer cursor: move the entry column along inside the
    /// active range, or drop the entry once the cursor leaves it.
    pub fn update_cursor_context(&mut self, row: usize, col: usize) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };
        if entry.contains(row, col) {
            entry.cursor_col = col;
        } else {
            trace!(target: "ops.entry", row, col, "entry_left");
            self.entry = None;
        }
    }

    /// Box containing (row, col) when any of its ranges is locked.
    pub fn locked_box_at(&self, row: usize, col: usize) -> Option<BoxRange> {
        self.ranges
            .iter()
            .find(|r| r.locked && r.box_range.contains(row, col))
            .map(|r| r.box_range)
    }

    /// Highlight the locked box under (row, col), or clear the highlight.
    pub fn select_at(&self, row: usize, col: usize, renderer: &mut dyn GridRenderer) -> Option<BoxRange> {
        let found = self.locked_box_at(row, col);
        match found {
            Some(b) => renderer.highlight_box(b.top_row, b.result_row, b.start_col, b.end_col),
            None => renderer.clear_highlight(),
        }
        found
    }

    /// Wipe a box from the grid and forget every range that belongs to it.
    /// Returns how many ranges were dropped.
    pub fn remove_box_range(&mut self, grid: &mut Grid, renderer: &mut dyn GridRenderer, box_range: &BoxRange) -> usize {
        for row in box_range.rows() {
            for col in box_range.start_col..=box_range.end_col {
                grid.reset_cell(row, col);
                renderer.update_cell(row, col);
            }
            renderer.remove_underline(row, box_range.start_col, box_range.end_col);
        }
        let before = self.ranges.len();
        self.ranges.retain(|r| r.box_range != *box_range);
        if self.entry.as_ref().is_some_and(|e| e.range.box_range == *box_range) {
            self.entry = None;
        }
        renderer.clear_highlight();
        let removed = before - self.ranges.len();
        debug!(
            target: "ops.registry",
            top_row = box_range.top_row,
            result_row = box_range.result_row,
            removed,
            "box_removed"
        );
        removed
    }

    /// Forget everything: pending operator, entry, ranges and division states.
    pub fn reset(&mut self) {
        self.active = None;
        self.entry = None;
        self.ranges.clear();
        self.divisions.clear();
        debug!(target: "ops.registry", "reset");
    }

    pub fn division_state(&self, row: usize, anchor_col: usize) -> Option<&DivisionJumpState> {
        self.divisions.get(&DivisionKey { row, anchor_col })
    }
}

fn clear_coloring(grid: &mut Grid, renderer: &mut dyn GridRenderer, row: usize, start: usize, end: usize) {
    for col in start..=end {
        if grid.flags(row, col).intersects(CellFlags::COLORING) {
            grid.remove_flags(row, col, CellFlags::COLORING);
            renderer.update_cell(row, col);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_render::NullRenderer;

    fn typed(text: &str, op_col: usize) -> (Grid, OperationRegistry) {
        let mut grid = Grid::new(12, 12);
        grid.write_str(0, 0, text);
        let mut reg = OperationRegistry::new();
        let symbol = text.chars().nth(op_col).unwrap();
        assert!(reg.begin_operation(symbol, 0, op_col));
        (grid, reg)
    }

    #[test]
    fn non_operator_does_not_begin() {
        let mut reg = OperationRegistry::new();
        assert!(!reg.begin_operation('7', 0, 0));
        assert!(reg.active_operation().is_none());
    }

    #[test]
    fn format_consumes_active_operation_even_on_failure() {
        let (mut grid, mut reg) = typed("12+", 2);
        assert!(reg.format_active_operation(&mut grid, &mut NullRenderer).is_none());
        assert!(reg.active_operation().is_none());
        assert_eq!(grid.row_text(0), "12+");
    }

    #[test]
    fn wrong_final_answer_is_flagged_and_entry_stays() {
        let (mut grid, mut reg) = typed("12+7", 2);
        reg.format_active_operation(&mut grid, &mut NullRenderer).unwrap();
        reg.handle_result_digit(&mut grid, &mut NullRenderer, '8');
        let step = reg.handle_result_digit(&mut grid, &mut NullRenderer, '1');
        assert_eq!(step.verdict(), Some(Verdict::Wrong));
        assert!(grid.flags(2, 0).contains(CellFlags::WRONG));
        assert!(reg.active_entry().is_some());

        // Typing again clears the red.
        reg.update_cursor_context(2, 1);
        reg.handle_result_digit(&mut grid, &mut NullRenderer, '9');
        assert!(!grid.flags(2, 0).contains(CellFlags::WRONG));
    }

    #[test]
    fn reset_clears_everything() {
        let (mut grid, mut reg) = typed("8:2", 1);
        reg.format_active_operation(&mut grid, &mut NullRenderer).unwrap();
        reg.begin_operation('+', 4, 4);
        reg.reset();
        assert!(reg.active_operation().is_none());
        assert!(reg.divisions().is_empty());
        assert!(reg.ranges().is_empty());
    }
}
