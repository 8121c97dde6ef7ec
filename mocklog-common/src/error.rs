//! Common error types for mocklog

use crate::import::RowViolations;
use crate::record::FieldViolation;
use crate::taxonomy::Field;
use thiserror::Error;

/// Common result type for mocklog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across mocklog crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Imported table lacks one or more required fields
    #[error("Missing columns in uploaded file: {}", join_fields(.0))]
    MissingColumns(Vec<Field>),

    /// Import source is neither CSV nor XLSX
    #[error("Unsupported file format: {0} (upload a .csv or .xlsx file)")]
    UnsupportedFormat(String),

    /// Import body could not be decoded in its declared format
    #[error("Unreadable table: {0}")]
    Tabular(String),

    /// A single record failed validation
    #[error("Invalid record: {}", join_display(.0))]
    InvalidRecord(Vec<FieldViolation>),

    /// One or more imported rows failed validation
    #[error("{} imported row(s) failed validation: {}", .0.len(), join_display(.0))]
    InvalidRows(Vec<RowViolations>),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.header())
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_display<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_names_headers() {
        let err = Error::MissingColumns(vec![Field::QNo, Field::Remarks]);
        assert_eq!(err.to_string(), "Missing columns in uploaded file: Q No., Remarks");
    }
}
