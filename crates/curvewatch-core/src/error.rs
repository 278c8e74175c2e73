//! Error types for the core crate.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// The main error type for core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Error in date calculations or an unparseable date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// A numeric field could not be parsed.
    #[error("Invalid number in field '{field}': {value}")]
    InvalidNumber {
        /// Name of the field being parsed.
        field: String,
        /// The raw text that failed to parse.
        value: String,
    },

    /// A raw dataset row could not be normalized.
    #[error("Row {row}: {reason}")]
    InvalidRow {
        /// 1-based row number in the source.
        row: usize,
        /// Description of the problem.
        reason: String,
    },

    /// A required column is missing from a table.
    #[error("Missing column: {column}")]
    MissingColumn {
        /// Name of the missing column.
        column: String,
    },

    /// The price-history provider failed.
    #[error("Price source error: {reason}")]
    SourceError {
        /// Description of the failure.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid number error.
    #[must_use]
    pub fn invalid_number(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidNumber {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates an invalid row error.
    #[must_use]
    pub fn invalid_row(row: usize, reason: impl Into<String>) -> Self {
        Self::InvalidRow {
            row,
            reason: reason.into(),
        }
    }

    /// Creates a price source error.
    #[must_use]
    pub fn source_error(reason: impl Into<String>) -> Self {
        Self::SourceError {
            reason: reason.into(),
        }
    }
}
