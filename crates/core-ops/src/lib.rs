//! Arithmetic layout and guided answer entry on a character grid.
//!
//! An operator typed inline (`12+7`, `123*45`, `84:4`) is recorded by the
//! [`OperationRegistry`]. On Enter the registry hands it to the matching
//! strategy, which parses the operands, computes the answer, finds room below
//! the typed row and rewrites the grid into long form. The registry then keeps
//! the declared result ranges and walks the user through filling them in,
//! right to left, checking and locking each one.
//!
//! Modules:
//! - `operand`: operator symbols and the digit-run scanner.
//! - `planner`: downward shift that avoids existing content and locked boxes.
//! - `column`, `multiplication`, `division`: the per-operator layouts.
//! - `entry`: entry cursor state and step outcomes.
//! - `registry`: the coordinator the editor talks to.
//!
//! Nothing here draws. Grid mutations are reported through
//! [`core_render::GridRenderer`].

mod column;
mod division;
mod entry;
mod error;
mod multiplication;
mod operand;
mod planner;
mod range;
mod registry;
mod strategy;

pub use division::{DivisionJumpState, DivisionJumps, DivisionKey, DivisionPhase, WorkArea};
pub use entry::{ActiveEntry, EntryStep, Verdict};
pub use error::FormatError;
pub use multiplication::partial_products;
pub use operand::{MULTIPLICATION_DOT, Operand, OperandPair, OperatorKind, parse_around};
pub use planner::{ColumnSpan, SHIFT_BLOCK_ROWS, plan_shift};
pub use range::{ActiveOperation, BoxRange, EntryLayout, LayoutResult, RangeKind, ResultRange, UnderlineSpan};
pub use registry::OperationRegistry;
