//! File loading errors.

use thiserror::Error;

use curvewatch_core::CoreError;

/// Result type for file loaders.
pub type FileResult<T> = Result<T, FileError>;

/// File loading error type.
#[derive(Debug, Error)]
pub enum FileError {
    /// The file could not be opened or read
    #[error("cannot read '{path}': {message}")]
    Io {
        /// File path.
        path: String,
        /// Underlying error.
        message: String,
    },

    /// Malformed CSV
    #[error("CSV error: {0}")]
    Csv(String),

    /// A required column is absent from the header
    #[error("'{path}' has no column '{column}'")]
    MissingColumn {
        /// File path.
        path: String,
        /// Column looked up.
        column: String,
    },

    /// A row could not be converted
    #[error("'{path}' row {row}: {reason}")]
    InvalidRow {
        /// File path.
        path: String,
        /// 1-based data row number.
        row: usize,
        /// What went wrong.
        reason: String,
    },
}

impl FileError {
    pub(crate) fn invalid_row(path: &str, row: usize, reason: impl ToString) -> Self {
        Self::InvalidRow {
            path: path.to_string(),
            row,
            reason: reason.to_string(),
        }
    }
}

impl From<csv::Error> for FileError {
    fn from(e: csv::Error) -> Self {
        FileError::Csv(e.to_string())
    }
}

impl From<FileError> for CoreError {
    fn from(e: FileError) -> Self {
        CoreError::source_error(e.to_string())
    }
}
