//! Error types for the sheetmatch library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sheetmatch operations.
#[derive(Debug, Error)]
pub enum SheetMatchError {
    /// A referenced column is absent from its table.
    #[error("Column '{column}' not found in {table} table")]
    ColumnNotFound { column: String, table: String },

    /// Mismatched or empty key/compare lists, or otherwise unusable settings.
    #[error("Configuration error: {0}")]
    Config(String),

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

    /// Error opening or reading a spreadsheet workbook.
    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    /// The requested sheet does not exist in the workbook.
    #[error("Sheet '{0}' not found")]
    SheetNotFound(String),

    /// The header row index points past the last record.
    #[error("Header row {row} is out of range (source has {available} records)")]
    HeaderRowOutOfRange { row: usize, available: usize },

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Empty file or no usable columns.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Error writing an xlsx workbook.
    #[error("Xlsx write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SheetMatchError {
    /// Shorthand for a missing column on one side of an operation.
    pub fn column_not_found(column: impl Into<String>, table: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
            table: table.into(),
        }
    }

    /// Whether this error was raised while loading a source table.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Self::Io { .. }
                | Self::Csv(_)
                | Self::Workbook(_)
                | Self::SheetNotFound(_)
                | Self::HeaderRowOutOfRange { .. }
                | Self::UnsupportedFormat(_)
                | Self::EmptyData(_)
        )
    }
}

/// Result type alias for sheetmatch operations.
pub type Result<T> = std::result::Result<T, SheetMatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_not_found_message() {
        let err = SheetMatchError::column_not_found("color_code", "right");
        assert_eq!(err.to_string(), "Column 'color_code' not found in right table");
        assert!(!err.is_load_error());
    }

    #[test]
    fn test_load_error_grouping() {
        assert!(SheetMatchError::SheetNotFound("Sheet9".into()).is_load_error());
        assert!(SheetMatchError::HeaderRowOutOfRange { row: 4, available: 2 }.is_load_error());
        assert!(!SheetMatchError::Config("empty keys".into()).is_load_error());
    }
}
