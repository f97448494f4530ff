use thiserror::Error;

/// Why an operation could not be laid out. Every variant aborts formatting
/// before the grid is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("no operand digits on both sides of the operator at row {row}, col {col}")]
    MissingOperands { row: usize, col: usize },
    #[error("division by zero")]
    ZeroDivisor,
    #[error("subtraction would produce a negative result")]
    NegativeResult,
    #[error("operands too large to compute")]
    Overflow,
    #[error("not enough room in the grid for the layout")]
    NoRoom,
}
