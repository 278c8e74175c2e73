//! Engine error types.

use thiserror::Error;

use curvewatch_analytics::AnalyticsError;
use curvewatch_config::ConfigError;
use curvewatch_core::CoreError;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine error type.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A dataset the operation needs has not been loaded
    #[error("dataset not loaded: {0}")]
    MissingDataset(String),

    /// The request names something unknown or out of range
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Calculation error
    #[error("calculation error: {0}")]
    Analytics(#[from] AnalyticsError),

    /// Data source error
    #[error("data source error: {0}")]
    Source(String),

    /// Input fingerprinting failed
    #[error("fingerprint error: {0}")]
    Fingerprint(String),
}

impl EngineError {
    /// Creates a missing dataset error.
    #[must_use]
    pub fn missing_dataset(name: impl Into<String>) -> Self {
        Self::MissingDataset(name.into())
    }

    /// Creates an invalid request error.
    #[must_use]
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest(reason.into())
    }
}

impl From<ConfigError> for EngineError {
    fn from(e: ConfigError) -> Self {
        EngineError::Config(e.to_string())
    }
}

impl From<CoreError> for EngineError {
    fn from(e: CoreError) -> Self {
        EngineError::Source(e.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Fingerprint(e.to_string())
    }
}
