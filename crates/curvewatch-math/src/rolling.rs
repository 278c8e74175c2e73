//! Trailing-window statistics.
//!
//! A window of size `w` at position `i` covers `values[i + 1 - w..=i]`; the
//! first `w - 1` positions have no value.
//!
//! The streaming mean keeps a compensated (Neumaier) sum, and a window whose
//! values are all identical reports that value exactly.

use std::collections::VecDeque;

use crate::error::{MathError, MathResult};
use crate::stats::sample_std;

/// Streaming trailing mean over the last `size` pushed values.
///
/// ```
/// use curvewatch_math::rolling::RollingWindow;
///
/// let mut window = RollingWindow::new(2).unwrap();
/// assert_eq!(window.push(1.0), None);
/// assert_eq!(window.push(3.0), Some(2.0));
/// assert_eq!(window.push(5.0), Some(4.0));
/// ```
#[derive(Debug, Clone)]
pub struct RollingWindow {
    size: usize,
    buffer: VecDeque<f64>,
    sum: f64,
    compensation: f64,
    // Length of the trailing run of values equal to the newest one.
    repeat: usize,
}

impl RollingWindow {
    /// Creates an empty window. A zero size is rejected.
    pub fn new(size: usize) -> MathResult<Self> {
        if size == 0 {
            return Err(MathError::invalid_input("window size must be positive"));
        }
        Ok(Self {
            size,
            buffer: VecDeque::with_capacity(size),
            sum: 0.0,
            compensation: 0.0,
            repeat: 0,
        })
    }

    /// Window size.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// True once `size` values have been pushed.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.buffer.len() == self.size
    }

    /// Pushes a value and returns the mean of the window once it is full.
    #[allow(clippy::float_cmp)]
    pub fn push(&mut self, value: f64) -> Option<f64> {
        if self.buffer.len() == self.size {
            if let Some(old) = self.buffer.pop_front() {
                self.accumulate(-old);
            }
        }
        self.repeat = match self.buffer.back() {
            Some(&last) if last == value => self.repeat + 1,
            _ => 1,
        };
        self.buffer.push_back(value);
        self.accumulate(value);
        self.mean()
    }

    fn accumulate(&mut self, x: f64) {
        let total = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.compensation += (self.sum - total) + x;
        } else {
            self.compensation += (x - total) + self.sum;
        }
        self.sum = total;
    }

    /// Mean of the current window, if full.
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        if !self.is_full() {
            return None;
        }
        if self.repeat >= self.size {
            return self.buffer.back().copied();
        }
        Some((self.sum + self.compensation) / self.size as f64)
    }

    /// Sample standard deviation of the current window, if full.
    #[must_use]
    pub fn std(&self) -> Option<f64> {
        if !self.is_full() {
            return None;
        }
        let (a, b) = self.buffer.as_slices();
        if b.is_empty() {
            sample_std(a)
        } else {
            sample_std(&self.buffer.iter().copied().collect::<Vec<_>>())
        }
    }
}

/// Trailing mean for every position.
pub fn rolling_mean(values: &[f64], window: usize) -> MathResult<Vec<Option<f64>>> {
    let mut rolling = RollingWindow::new(window)?;
    Ok(values.iter().map(|v| rolling.push(*v)).collect())
}

/// Trailing sample standard deviation for every position.
///
/// A window of 1 has no sample deviation, so every position is `None`.
pub fn rolling_std(values: &[f64], window: usize) -> MathResult<Vec<Option<f64>>> {
    if window == 0 {
        return Err(MathError::invalid_input("window size must be positive"));
    }
    Ok((0..values.len())
        .map(|i| {
            if i + 1 < window {
                None
            } else {
                sample_std(&values[i + 1 - window..=i])
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rolling_mean_window_three() {
        let out = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 3).unwrap();
        assert_eq!(out, vec![None, None, Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_constant_window_mean_is_exact() {
        for price in [0.1, 10.1, 33.37, 7.3] {
            let out = rolling_mean(&vec![price; 1000], 3).unwrap();
            assert!(out[2..].iter().all(|m| *m == Some(price)), "{price}");
        }
    }

    #[test]
    fn test_mean_recovers_after_spike() {
        let mut values = vec![1e12, -1e12];
        values.extend(std::iter::repeat(0.3).take(20));
        values.push(0.6);
        let out = rolling_mean(&values, 4).unwrap();
        assert_eq!(out[21], Some(0.3));
        assert_relative_eq!(out[22].unwrap(), 0.375, epsilon = 1e-12);
    }

    #[test]
    fn test_window_longer_than_input() {
        let out = rolling_mean(&[1.0, 2.0], 5).unwrap();
        assert!(out.iter().all(Option::is_none));
        assert!(rolling_mean(&[], 5).unwrap().is_empty());
    }

    #[test]
    fn test_zero_window_rejected() {
        assert!(rolling_mean(&[1.0], 0).is_err());
        assert!(rolling_std(&[1.0], 0).is_err());
        assert!(RollingWindow::new(0).is_err());
    }

    #[test]
    fn test_rolling_std() {
        let out = rolling_std(&[1.0, 2.0, 3.0, 5.0], 3).unwrap();
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert_relative_eq!(out[2].unwrap(), 1.0);
        // [2, 3, 5]: mean 10/3
        assert_relative_eq!(out[3].unwrap(), (7.0_f64 / 3.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_window_std_matches_slice_std() {
        let mut window = RollingWindow::new(3).unwrap();
        for v in [4.0, 8.0, 1.0, 9.0, 2.0] {
            window.push(v);
        }
        assert_relative_eq!(
            window.std().unwrap(),
            sample_std(&[1.0, 9.0, 2.0]).unwrap(),
            epsilon = 1e-12
        );
    }
}
