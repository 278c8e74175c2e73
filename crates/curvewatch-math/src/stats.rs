//! Descriptive statistics over full samples.
//!
//! Thin wrappers over `statrs` that return `None` instead of `NaN` when the
//! sample is too small.

use statrs::statistics::{Data, Median, Statistics};

/// Arithmetic mean. `None` for an empty sample.
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.mean())
}

/// Sample standard deviation (divisor `n - 1`). `None` below two points.
#[must_use]
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    Some(values.std_dev())
}

/// Median; the mean of the two middle values for even-length samples.
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(Data::new(values.to_vec()).median())
}
