//! Error types for the reshape engine.

use melt_model::{ColumnType, ModelError};
use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised while standardizing a wide table.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Identifier columns named by the dataset are absent from the table.
    #[error("dataset '{dataset}' is missing identifier columns: {}", missing.join(", "))]
    MissingIdentifiers {
        dataset: String,
        missing: Vec<String>,
    },

    /// The measure selector matched no column.
    #[error("dataset '{dataset}': measure selector matched none of {column_count} columns")]
    NoMeasureColumns {
        dataset: String,
        column_count: usize,
    },

    /// A non-null value cannot be converted to its declared type.
    #[error(
        "chunk {chunk}: {failed_count} value(s) in column '{column}'{} cannot be converted to {target} (e.g., {})",
        source_column.as_ref().map(|s| format!(" (source '{s}')")).unwrap_or_default(),
        samples.join(", ")
    )]
    TypeCoercion {
        chunk: usize,
        column: String,
        source_column: Option<String>,
        target: ColumnType,
        failed_count: usize,
        samples: Vec<String>,
    },

    /// Measure headers do not match the configured date format.
    #[error("measure headers do not match date format '{format}': {}", headers.join(", "))]
    DateParse { format: String, headers: Vec<String> },

    /// Two output columns standardize to the same canonical name.
    #[error("columns {} all standardize to '{canonical}'", sources.join(", "))]
    DuplicateColumnName {
        canonical: String,
        sources: Vec<String>,
    },

    /// A source column name standardizes to nothing.
    #[error("column '{0}' has no characters left after standardization")]
    EmptyColumnName(String),

    #[error("chunk size must be positive")]
    InvalidChunkSize,

    #[error("failed to build chunk worker pool: {0}")]
    WorkerPool(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("DataFrame operation failed: {0}")]
    Polars(#[from] PolarsError),
}

/// Result type for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;
