use thiserror::Error;

use crate::matrix::ShapeError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Unknown mode {0:?}: expected \"primal\" or \"dual\"")]
    InvalidMode(String),
    #[error("Malformed problem: {0}")]
    Shape(#[from] ShapeError),
    /// A pivot selection produced a zero pivot element.
    #[error("Zero pivot element at row {row}, column {column}")]
    ZeroPivot { row: usize, column: usize },
    #[error("No terminal state reached after {0} pivots")]
    IterationLimit(usize),
}

pub type SolverResult<T> = Result<T, SolverError>;
