//! Error types for tandem-io.

use std::path::PathBuf;

use tandem_series::SeriesError;

/// Error type for all fallible operations in the tandem-io crate.
///
/// Covers missing files, Parquet failures, columns that are absent or of an
/// unsupported type, and data that does not form a valid series.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an error originating from the Parquet or Arrow libraries.
    #[error("parquet error: {reason}")]
    Parquet {
        /// Description of the underlying failure.
        reason: String,
    },

    /// Returned when a configuration check fails.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },

    /// Returned when a required column is not present in a file.
    #[error("column '{name}' not found in {}", path.display())]
    MissingColumn {
        /// Name of the missing column.
        name: String,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when a column has a type that cannot be read.
    #[error("column '{name}' has unsupported type {data_type}, expected {expected}")]
    UnsupportedType {
        /// Column name.
        name: String,
        /// Type found in the file.
        data_type: String,
        /// Accepted type(s).
        expected: &'static str,
    },

    /// Returned when a required value is null.
    #[error("null value in column '{column}' at row {row}")]
    NullValue {
        /// Column name.
        column: String,
        /// Row index across the whole file.
        row: usize,
    },

    /// Returned when a Date32 value does not map to a calendar date.
    #[error("invalid date: {days} days from the Unix epoch")]
    InvalidDate {
        /// Raw Date32 value.
        days: i32,
    },

    /// Returned when the data does not form a valid series or frame.
    #[error("invalid data: {0}")]
    Series(#[from] SeriesError),
}

impl From<parquet::errors::ParquetError> for IoError {
    fn from(e: parquet::errors::ParquetError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}

impl From<arrow::error::ArrowError> for IoError {
    fn from(e: arrow::error::ArrowError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}
