//! Equal-width histograms.

use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};

/// Bin edges and counts of an equal-width histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// `bins + 1` ascending edges.
    pub edges: Vec<f64>,
    /// Count per bin. Bins are half-open except the last, which is closed.
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Total number of counted values.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Index of the bin holding `value`, if it lies inside the edges.
    #[must_use]
    pub fn bin_of(&self, value: f64) -> Option<usize> {
        let (first, last) = (*self.edges.first()?, *self.edges.last()?);
        if !(first..=last).contains(&value) {
            return None;
        }
        let bins = self.counts.len();
        if last == first {
            return Some(0);
        }
        let idx = ((value - first) / (last - first) * bins as f64).floor() as usize;
        Some(idx.min(bins - 1))
    }
}

/// Bins `values` into `bins` equal-width buckets spanning their range.
///
/// Non-finite values are ignored. A constant sample gets a unit-wide range
/// centred on the value, so every value still lands in a bin.
pub fn histogram(values: &[f64], bins: usize) -> MathResult<Histogram> {
    if bins == 0 {
        return Err(MathError::invalid_input("histogram needs at least one bin"));
    }
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Err(MathError::insufficient_data(1, 0));
    }

    let mut lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
    let mut result = Histogram {
        edges,
        counts: vec![0; bins],
    };
    for v in finite {
        if let Some(idx) = result.bin_of(v) {
            result.counts[idx] += 1;
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_basic_binning() {
        let h = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0], 2).unwrap();
        assert_eq!(h.edges.len(), 3);
        assert_relative_eq!(h.edges[1], 2.0);
        // [0, 2) and [2, 4]
        assert_eq!(h.counts, vec![2, 3]);
        assert_eq!(h.total(), 5);
    }

    #[test]
    fn test_constant_sample() {
        let h = histogram(&[5.0, 5.0, 5.0], 4).unwrap();
        assert_eq!(h.total(), 3);
        assert_eq!(h.bin_of(5.0), Some(2));
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(histogram(&[1.0], 0).is_err());
        assert!(histogram(&[], 10).is_err());
        assert!(histogram(&[f64::NAN], 10).is_err());
    }

    #[test]
    fn test_outside_range_has_no_bin() {
        let h = histogram(&[0.0, 10.0], 5).unwrap();
        assert_eq!(h.bin_of(-1.0), None);
        assert_eq!(h.bin_of(10.0), Some(4));
    }
}
