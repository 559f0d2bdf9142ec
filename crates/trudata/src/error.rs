//! Error types for the Trudata library.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::dataset::ColumnType;

/// Main error type for Trudata operations.
///
/// These are boundary failures: unreadable input, malformed rule documents,
/// inconsistent datasets. A row that violates a rule is never an error.
#[derive(Debug, Error)]
pub enum TrudataError {
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

    /// Empty input or no rows to score.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Malformed rule specification or inconsistent dataset shape.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for Trudata operations.
pub type Result<T> = std::result::Result<T, TrudataError>;

/// Why a single rule clause could not be evaluated.
///
/// Recorded per clause in the issue report; evaluation of the remaining
/// clauses continues.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClauseError {
    /// The rule names a column the dataset does not have.
    #[error("column '{column}' does not exist in the dataset")]
    MissingColumn { column: String },

    /// The clause cannot be applied to a column of this type.
    #[error("{clause} rule cannot be applied to {column_type} column '{column}'")]
    IncompatibleType {
        column: String,
        clause: String,
        column_type: ColumnType,
    },

    /// A range bound cannot be interpreted for this column type.
    #[error("range bound '{bound}' is not valid for {column_type} column '{column}'")]
    InvalidBound {
        column: String,
        bound: String,
        column_type: ColumnType,
    },

    /// The range lower bound exceeds the upper bound.
    #[error("range on column '{column}' has min {min} greater than max {max}")]
    InvalidRange {
        column: String,
        min: String,
        max: String,
    },

    /// The pattern is not a valid regular expression.
    #[error("pattern '{pattern}' on column '{column}' does not compile: {message}")]
    InvalidPattern {
        column: String,
        pattern: String,
        message: String,
    },
}

impl ClauseError {
    /// The column the failing clause was bound to.
    pub fn column(&self) -> &str {
        match self {
            ClauseError::MissingColumn { column }
            | ClauseError::IncompatibleType { column, .. }
            | ClauseError::InvalidBound { column, .. }
            | ClauseError::InvalidRange { column, .. }
            | ClauseError::InvalidPattern { column, .. } => column,
        }
    }
}
