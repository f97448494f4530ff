//! Long division: an `=` after the divisor, then a cursor that hops between
//! the quotient, the working rows, and back.
//!
//! ```text
//!   84:4=2_        quotient digits go right of '='
//!   8_             remainder work, one row per step
//! ```
//!
//! Cycle, with `step` starting at 0:
//! 1. Quotient digit typed on the dividend row: `step += 1`, jump to `(dividend_row + step, dividend_start)`.
//! 2. Remainder digit typed below: jump one column right.
//! 3. Brought-down digit typed below: jump to `(dividend_row, quotient_start + step)`.

use crate::FormatError;
use crate::operand::{OperatorKind, parse_around};
use crate::range::ActiveOperation;
use crate::strategy::{FormatContext, Formatted};
use core_grid::Position;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DivisionPhase {
    Quotient,
    Remainder,
    BroughtDown,
}

/// Region where typed digits are routed to the jump controller. Inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkArea {
    pub top_row: usize,
    pub bottom_row: usize,
    pub start_col: usize,
    pub end_col: usize,
}

impl WorkArea {
    pub fn contains(&self, pos: Position) -> bool {
        (self.top_row..=self.bottom_row).contains(&pos.row) && (self.start_col..=self.end_col).contains(&pos.col)
    }
}

/// Identifies a division by the row and column of its operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DivisionKey {
    pub row: usize,
    pub anchor_col: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivisionJumpState {
    pub dividend_row: usize,
    pub dividend_start_col: usize,
    pub quotient_start_col: usize,
    pub current_step: usize,
    pub phase: DivisionPhase,
    pub work_area: WorkArea,
}

impl DivisionJumpState {
    /// Whether a digit typed at `pos` belongs to this division's current phase.
    pub fn claims(&self, pos: Position) -> bool {
        if !self.work_area.contains(pos) {
            return false;
        }
        match self.phase {
            DivisionPhase::Quotient => pos.row == self.dividend_row && pos.col >= self.quotient_start_col,
            DivisionPhase::Remainder | DivisionPhase::BroughtDown => pos.row > self.dividend_row,
        }
    }

    /// Step the cycle after a digit was typed at `typed`; returns the jump target.
    pub fn advance(&mut self, typed: Position) -> Position {
        match self.phase {
            DivisionPhase::Quotient => {
                self.current_step += 1;
                self.phase = DivisionPhase::Remainder;
                Position::new(self.dividend_row + self.current_step, self.dividend_start_col)
            }
            DivisionPhase::Remainder => {
                self.phase = DivisionPhase::BroughtDown;
                Position::new(typed.row, typed.col + 1)
            }
            DivisionPhase::BroughtDown => {
                self.phase = DivisionPhase::Quotient;
                Position::new(self.dividend_row, self.quotient_start_col + self.current_step)
            }
        }
    }
}

/// Jump states of every formatted division, ordered by position.
#[derive(Debug, Default, Clone)]
pub struct DivisionJumps {
    states: BTreeMap<DivisionKey, DivisionJumpState>,
}

impl DivisionJumps {
    pub fn insert(&mut self, key: DivisionKey, state: DivisionJumpState) {
        self.states.insert(key, state);
    }

    pub fn get(&self, key: &DivisionKey) -> Option<&DivisionJumpState> {
        self.states.get(key)
    }

    /// First division (by position) whose current phase claims `pos`.
    pub fn claim_mut(&mut self, pos: Position) -> Option<(DivisionKey, &mut DivisionJumpState)> {
        self.states
            .iter_mut()
            .find(|(_, state)| state.claims(pos))
            .map(|(key, state)| (*key, state))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DivisionKey, &DivisionJumpState)> {
        self.states.iter()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }
}

pub(crate) struct DivisionLayout {
    pub key: DivisionKey,
    pub cursor: Position,
    pub state: DivisionJumpState,
}

pub(crate) fn format_division(
    ctx: &mut FormatContext<'_>,
    active: &ActiveOperation,
) -> Result<Formatted, FormatError> {
    let row = active.row;
    let pair = parse_around(ctx.grid, row, active.anchor_col, OperatorKind::Division).ok_or(
        FormatError::MissingOperands {
            row,
            col: active.anchor_col,
        },
    )?;
    let (a, b) = (&pair.left, &pair.right);
    a.value()?;
    if b.value()? == 0 {
        return Err(FormatError::ZeroDivisor);
    }
    let equals_col = b.end + 1;
    let quotient_start_col = equals_col + 1;
    // The first quotient digit must land right of `=`, never on it.
    if !ctx.grid.in_bounds(row, quotient_start_col) {
        return Err(FormatError::NoRoom);
    }
    if ctx.grid.get(row, equals_col).is_none() {
        ctx.put(row, equals_col, '=');
    }

    let size = a.width() + 1 + b.width() + 1;
    let state = DivisionJumpState {
        dividend_row: row,
        dividend_start_col: a.start,
        quotient_start_col,
        current_step: 0,
        phase: DivisionPhase::Quotient,
        work_area: WorkArea {
            top_row: row,
            bottom_row: row + size,
            start_col: a.start,
            end_col: equals_col + size,
        },
    };
    debug!(target: "ops.division", a = %a.digits, b = %b.digits, row, equals_col, size, "division_layout");
    Ok(Formatted::Division(DivisionLayout {
        key: DivisionKey {
            row,
            anchor_col: active.anchor_col,
        },
        cursor: Position::new(row, quotient_start_col),
        state,
    }))
}
