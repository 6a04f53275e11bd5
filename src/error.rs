//! Error types for the vector, matrix and solver operations.

use thiserror::Error;

/// Structural and numerical failures.
///
/// A linear system without a solution is not represented here: that is an
/// expected outcome of valid input and is reported through
/// [`Solvability`](crate::solver::linear_system::Solvability) instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinalgError {
    /// Empty or jagged input at construction.
    #[error("Invalid shape: {reason}")]
    InvalidShape { reason: String },

    /// Operands of an elementwise or product operation have incompatible shapes.
    #[error("Shape mismatch: lhs={lhs:?}, rhs={rhs:?}")]
    ShapeMismatch {
        lhs: (usize, usize),
        rhs: (usize, usize),
    },

    /// Coefficient matrix and right-hand side disagree on the row count.
    #[error("Dimension mismatch: coefficient matrix has {rows} rows, right-hand side has {rhs_rows}")]
    DimensionMismatch { rows: usize, rhs_rows: usize },

    #[error("Matrix is not square ({rows}x{cols})")]
    NotSquare { rows: usize, cols: usize },

    #[error("Index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Division by zero: |{divisor}| is not above epsilon {epsilon}")]
    DivisionByZero { divisor: f64, epsilon: f64 },

    #[error("Cannot normalize: norm {norm} is below epsilon {epsilon}")]
    ZeroNorm { norm: f64, epsilon: f64 },

    #[error("Invalid tolerance: epsilon must be finite and positive (got {epsilon})")]
    InvalidTolerance { epsilon: f64 },
}

pub type LinalgResult<T> = Result<T, LinalgError>;

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
