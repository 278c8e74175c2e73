//! CLI error types.

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid date format.
    #[error("Invalid date format: {0}. Use YYYY-MM-DD or DD/MM/YYYY.")]
    InvalidDate(String),

    /// Malformed `NAME=PATH` pair.
    #[error("Invalid index file '{0}'. Use NAME=PATH.")]
    InvalidIndexFile(String),

    /// Refusing to overwrite a file.
    #[error("'{0}' already exists. Pass --force to overwrite.")]
    FileExists(String),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
