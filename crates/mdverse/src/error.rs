//! Error types for the MDverse explorer library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for MDverse operations.
#[derive(Debug, Error)]
pub enum MdverseError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no header to read.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// The record store could not be built.
    #[error("Ingestion failed: {0}")]
    Ingestion(#[from] IngestionError),

    /// A column required by an operation is absent.
    #[error("Column '{column}' not found in table '{table}'")]
    MissingColumn { table: String, column: String },

    /// A filter constraint is malformed or does not fit the column.
    #[error("Invalid constraint for column '{column}': {message}")]
    InvalidConstraint { column: String, message: String },

    /// Unknown table name.
    #[error("Unknown table: {0}. Use datasets, gro or mdp.")]
    UnknownTable(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Fatal problems found while building the joined tables.
///
/// Any of these aborts the load; no partially built table is ever served.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestionError {
    /// Duplicate keys on a side that the join declares unique.
    #[error(
        "join of '{left}' and '{right}' is not {validate}: key ({key}) is duplicated on the {side} side"
    )]
    CardinalityViolation {
        left: String,
        right: String,
        validate: String,
        side: String,
        key: String,
    },

    /// A raw table lacks one of the composite key columns.
    #[error("table '{table}' has no key column '{column}'")]
    MissingKeyColumn { table: String, column: String },

    /// A key cell is empty.
    #[error("table '{table}' row {row}: key column '{column}' is empty")]
    NullKey {
        table: String,
        row: usize,
        column: String,
    },

    /// A `dataset_origin` cell names no known repository.
    #[error("table '{table}' row {row}: unknown dataset origin '{value}'")]
    UnknownOrigin {
        table: String,
        row: usize,
        value: String,
    },
}

/// Result type alias for MDverse operations.
pub type Result<T> = std::result::Result<T, MdverseError>;
