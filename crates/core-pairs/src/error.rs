//! Error types for pair finding, cache encoding and ingestion

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the pair finder
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PairError {
    /// The scan finished without finding two elements summing to the target
    #[error("No valid pair found")]
    NotFound,

    /// Precondition violated (fewer than two elements)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Errors decoding a cached pair
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("malformed cache value: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("cache value has inconsistent shape: {0}")]
    Shape(String),
}

/// Errors reading numbers out of a spreadsheet
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("cannot read spreadsheet {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("spreadsheet {0} contains no worksheet")]
    EmptyWorkbook(PathBuf),

    #[error("column '{column}' not found in header row")]
    MissingColumn { column: String },

    #[error("row {row}: '{value}' is not an integer")]
    InvalidCell { row: usize, value: String },
}
