use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("row index {index} is out of range (row count {len})")]
    RowOutOfRange { index: usize, len: usize },
    #[error("row {index} has {found} cells but the row set has {expected} columns")]
    CellCountMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("status column index {index} is outside the {len} columns")]
    StatusColumnOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, ModelError>;
