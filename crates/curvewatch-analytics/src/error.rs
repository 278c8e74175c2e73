//! Error types for the analytics.

use curvewatch_core::{CoreError, Date};
use thiserror::Error;

/// Result type alias for analytics operations.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Error type for all analytics operations.
///
/// Most "no data" situations are not errors: they produce empty results.
/// Only the cases below fail a call.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalyticsError {
    /// Nearest-maturity selection over an empty set.
    #[error("empty universe: no maturities available for {0}")]
    EmptyUniverse(String),

    /// A computation that needs at least one observation got none.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// A ratio denominator (or numerator) is zero or negative.
    #[error("degenerate division: {series} has non-positive price {value} on {date}")]
    DegenerateDivision {
        /// Which side of the pair.
        series: String,
        /// Date of the offending price.
        date: Date,
        /// The offending price.
        value: f64,
    },

    /// Invalid input parameter.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Date arithmetic failed.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// Error from the core crate.
    #[error("core error: {0}")]
    Core(String),

    /// Statistics error.
    #[error("math error: {0}")]
    Math(String),
}

impl AnalyticsError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }

    /// Creates an empty universe error.
    #[must_use]
    pub fn empty_universe(context: impl Into<String>) -> Self {
        Self::EmptyUniverse(context.into())
    }
}

impl From<CoreError> for AnalyticsError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidDate { message } => AnalyticsError::InvalidDate(message),
            other => AnalyticsError::Core(other.to_string()),
        }
    }
}

impl From<curvewatch_math::MathError> for AnalyticsError {
    fn from(err: curvewatch_math::MathError) -> Self {
        match err {
            curvewatch_math::MathError::InvalidInput { reason } => {
                AnalyticsError::InvalidInput(reason)
            }
            other => AnalyticsError::Math(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = AnalyticsError::DegenerateDivision {
            series: "PETR4".into(),
            date: Date::from_ymd(2025, 1, 2).unwrap(),
            value: 0.0,
        };
        assert_eq!(
            err.to_string(),
            "degenerate division: PETR4 has non-positive price 0 on 2025-01-02"
        );
    }

    #[test]
    fn test_math_invalid_input_maps_to_invalid_input() {
        let err: AnalyticsError = curvewatch_math::MathError::invalid_input("window").into();
        assert_eq!(err, AnalyticsError::InvalidInput("window".into()));
    }
}
