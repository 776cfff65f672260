use ndarray_linalg::error::LinalgError;
use std::io;
use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

/// Failures that happen on this side of the solver.
///
/// What the solver itself reports (infeasibility, numerical trouble, a
/// missing binary) is a [`TerminationStatus`](crate::csdp::TerminationStatus),
/// not an error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Error while parsing solver file: {0}")]
    Parse(String),
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("Eigendecomposition failed: {0}")]
    Linalg(#[from] LinalgError),
    #[error("Matrix is not square")]
    NotSquare,
    #[error("Matrix is not symmetric at ({row}, {col})")]
    NotSymmetric { row: usize, col: usize },
    #[error("Expected {expected} elements, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("Empty part in multipartite partition")]
    EmptyPartition,
    #[error("Variable {0} appears in several parts of the partition")]
    OverlappingPartition(String),
}

impl From<ParseIntError> for Error {
    fn from(e: ParseIntError) -> Self {
        Error::Parse(format!("{}", e))
    }
}

impl From<ParseFloatError> for Error {
    fn from(e: ParseFloatError) -> Self {
        Error::Parse(format!("{}", e))
    }
}
