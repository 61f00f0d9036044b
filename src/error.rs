//! Error types for the chart pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading data or building a chart specification.
///
/// Validation outcomes (a non-numeric value column, a numeric label column)
/// are not errors; see [`crate::validate::ValidationResult`].
#[derive(Debug, Error)]
pub enum ChartError {
    /// A requested column is not present in the dataset.
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    /// The number of colors does not match the number of bars.
    #[error("Color count mismatch: {bars} bars but {colors} colors")]
    ColorCountMismatch { bars: usize, colors: usize },

    /// A fixed color could not be parsed as a hex RGB value.
    #[error("Invalid color '{0}': expected #rrggbb or #rgb")]
    InvalidColor(String),

    /// The input file type is not handled by the loader.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Input contained no header row or no usable structure.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Error reading a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV reader.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ChartError>;
