//! Errors raised while building, reading or writing tabular data.

use arrow::error::ArrowError;
use thiserror::Error;

/// Errors from frame construction, synthetic generation and file IO.
#[derive(Debug, Error)]
pub enum DataError {
    /// A uniform column was requested with `low > high`.
    #[error("invalid range for column '{name}': low ({low}) must not exceed high ({high})")]
    InvalidRange { name: String, low: f64, high: f64 },

    #[error("column '{0}' not found")]
    MissingColumn(String),

    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),

    /// Column names and values disagree in shape.
    #[error("shape mismatch: expected {expected} columns, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("column '{column}' has {got} rows, expected {expected}")]
    RaggedColumn { column: String, expected: usize, got: usize },

    #[error("non-finite value in feature {feature} at row {row}")]
    NonFinite { feature: usize, row: usize },

    #[error("column '{column}' has unsupported type {data_type}")]
    UnsupportedType { column: String, data_type: String },

    #[error("shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("malformed table: {0}")]
    Malformed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),

    #[cfg(feature = "io-parquet")]
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}
