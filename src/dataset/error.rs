//! Dataset loading error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the dataset at startup
#[derive(Error, Debug)]
pub enum DatasetError {
    /// The dataset file could not be opened
    #[error("Failed to open dataset {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV (ragged rows, invalid UTF-8, read failure)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Header row does not line up with the column schema
    #[error("Expected {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },

    /// A timestamp cell could not be parsed
    #[error("Invalid timestamp at row {row}: '{value}'")]
    Timestamp { row: usize, value: String },
}

/// Result type for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;
