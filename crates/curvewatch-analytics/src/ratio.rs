//! Relative-value statistics on the ratio of two price series.
//!
//! The two series are inner-joined on date (never forward-filled) and
//! divided. Around the ratio the engine draws two sets of bands:
//!
//! - **Rolling**: trailing mean ± 2 sample standard deviations over `window`
//!   observations. The first `window - 1` points have no band.
//! - **Static**: the all-history median ± 1 and ± 2 sample standard
//!   deviations.

use curvewatch_core::{Date, Series};
use curvewatch_math::rolling::{rolling_mean, rolling_std};
use curvewatch_math::stats::{mean, median, sample_std};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};

/// Default rolling window: one trading year.
pub const DEFAULT_RATIO_WINDOW: usize = 252;

/// One date of the ratio with its rolling statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioPoint {
    /// Observation date.
    pub date: Date,
    /// `a / b` on this date.
    pub ratio: f64,
    /// Trailing mean, once the window is full.
    pub rolling_mean: Option<f64>,
    /// Trailing mean + 2σ.
    pub rolling_upper: Option<f64>,
    /// Trailing mean − 2σ.
    pub rolling_lower: Option<f64>,
}

/// Bands around the full-history median.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaticBands {
    /// Median of the whole ratio history.
    pub median: f64,
    /// Sample standard deviation of the whole history; `None` below two
    /// points, in which case every band is `None` too.
    pub std_dev: Option<f64>,
    /// Median + 1σ.
    pub upper_1x: Option<f64>,
    /// Median − 1σ.
    pub lower_1x: Option<f64>,
    /// Median + 2σ.
    pub upper_2x: Option<f64>,
    /// Median − 2σ.
    pub lower_2x: Option<f64>,
}

impl StaticBands {
    fn new(median: f64, std_dev: Option<f64>) -> Self {
        let band = |k: f64| std_dev.map(|s| median + k * s);
        Self {
            median,
            std_dev,
            upper_1x: band(1.0),
            lower_1x: band(-1.0),
            upper_2x: band(2.0),
            lower_2x: band(-2.0),
        }
    }
}

/// Summary of the ratio for headline display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioKpis {
    /// Latest ratio.
    pub current: f64,
    /// Date of the latest ratio.
    pub current_date: Date,
    /// Mean over the whole history.
    pub mean: f64,
    /// Lowest ratio.
    pub min: f64,
    /// First date the lowest ratio occurred.
    pub min_date: Date,
    /// Highest ratio.
    pub max: f64,
    /// First date the highest ratio occurred.
    pub max_date: Date,
    /// `(mean / current − 1) × 100`; `+∞` when `current <= 0`.
    pub pct_to_mean: f64,
}

/// Ratio history with rolling and static bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioMetrics {
    /// Numerator series name.
    pub numerator: String,
    /// Denominator series name.
    pub denominator: String,
    /// Rolling window used.
    pub window: usize,
    /// Points in ascending date order.
    pub points: Vec<RatioPoint>,
    /// Static bands; `None` when there are no points.
    pub static_bands: Option<StaticBands>,
}

impl RatioMetrics {
    /// True when the two series share no date.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The ratio as a plain series named `"A/B"`.
    #[must_use]
    pub fn ratio_series(&self) -> Series {
        Series::from_points(
            format!("{}/{}", self.numerator, self.denominator),
            self.points.iter().map(|p| (p.date, p.ratio)),
        )
    }

    /// Headline figures, or `None` for an empty history.
    #[must_use]
    pub fn kpis(&self) -> Option<RatioKpis> {
        let last = self.points.last()?;
        let ratios: Vec<f64> = self.points.iter().map(|p| p.ratio).collect();
        let history_mean = mean(&ratios)?;

        // Strict comparisons keep the first occurrence.
        let mut min = self.points[0];
        let mut max = self.points[0];
        for p in &self.points[1..] {
            if p.ratio < min.ratio {
                min = *p;
            }
            if p.ratio > max.ratio {
                max = *p;
            }
        }

        let pct_to_mean = if last.ratio > 0.0 {
            (history_mean / last.ratio - 1.0) * 100.0
        } else {
            f64::INFINITY
        };

        Some(RatioKpis {
            current: last.ratio,
            current_date: last.date,
            mean: history_mean,
            min: min.ratio,
            min_date: min.date,
            max: max.ratio,
            max_date: max.date,
            pct_to_mean,
        })
    }
}

/// Computes ratio statistics for `a / b`.
///
/// Fails with `DegenerateDivision` if either side has a non-positive price
/// on a shared date, and with `InvalidInput` for a zero window.
pub fn ratio_metrics(a: &Series, b: &Series, window: usize) -> AnalyticsResult<RatioMetrics> {
    if window == 0 {
        return Err(AnalyticsError::invalid_input("ratio window must be positive"));
    }

    let joined = a.inner_join(b);
    for &(date, pa, pb) in &joined {
        for (name, value) in [(a.name(), pa), (b.name(), pb)] {
            if value <= 0.0 || !value.is_finite() {
                return Err(AnalyticsError::DegenerateDivision {
                    series: name.to_string(),
                    date,
                    value,
                });
            }
        }
    }

    let ratios: Vec<f64> = joined.iter().map(|(_, pa, pb)| pa / pb).collect();
    let means = rolling_mean(&ratios, window)?;
    let stds = rolling_std(&ratios, window)?;

    let points = joined
        .iter()
        .zip(ratios.iter().zip(means.iter().zip(&stds)))
        .map(|(&(date, _, _), (&ratio, (&m, &s)))| {
            let band = |k: f64| m.zip(s).map(|(m, s)| m + k * s);
            RatioPoint {
                date,
                ratio,
                rolling_mean: m,
                rolling_upper: band(2.0),
                rolling_lower: band(-2.0),
            }
        })
        .collect();

    let static_bands = median(&ratios).map(|m| StaticBands::new(m, sample_std(&ratios)));

    log::debug!(
        "ratio {}/{}: {} shared dates, window {window}",
        a.name(),
        b.name(),
        ratios.len()
    );

    Ok(RatioMetrics {
        numerator: a.name().to_string(),
        denominator: b.name().to_string(),
        window,
        points,
        static_bands,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(day: u32) -> Date {
        Date::from_ymd(2025, 1, day).unwrap()
    }

    fn series(name: &str, values: &[(u32, f64)]) -> Series {
        Series::from_points(name, values.iter().map(|(day, v)| (d(*day), *v)))
    }

    #[test]
    fn test_inner_join_and_rolling() {
        let a = series("A", &[(1, 2.0), (2, 4.0), (3, 6.0), (4, 8.0), (5, 100.0)]);
        let b = series("B", &[(1, 2.0), (2, 2.0), (3, 2.0), (4, 2.0), (6, 1.0)]);
        let metrics = ratio_metrics(&a, &b, 3).unwrap();

        let ratios: Vec<f64> = metrics.points.iter().map(|p| p.ratio).collect();
        assert_eq!(ratios, vec![1.0, 2.0, 3.0, 4.0]);
        let means: Vec<Option<f64>> = metrics.points.iter().map(|p| p.rolling_mean).collect();
        assert_eq!(means, vec![None, None, Some(2.0), Some(3.0)]);
        assert_relative_eq!(metrics.points[2].rolling_upper.unwrap(), 4.0);
        assert_relative_eq!(metrics.points[2].rolling_lower.unwrap(), 0.0);
    }

    #[test]
    fn test_static_bands() {
        let a = series("A", &[(1, 1.0), (2, 2.0), (3, 3.0), (4, 4.0)]);
        let b = series("B", &[(1, 1.0), (2, 1.0), (3, 1.0), (4, 1.0)]);
        let bands = ratio_metrics(&a, &b, 2).unwrap().static_bands.unwrap();
        let s = (5.0_f64 / 3.0).sqrt();
        assert_relative_eq!(bands.median, 2.5);
        assert_relative_eq!(bands.upper_1x.unwrap(), 2.5 + s, epsilon = 1e-12);
        assert_relative_eq!(bands.lower_2x.unwrap(), 2.5 - 2.0 * s, epsilon = 1e-12);
    }

    #[test]
    fn test_kpis_first_occurrence() {
        let a = series("A", &[(1, 1.0), (2, 3.0), (3, 1.0), (4, 3.0), (5, 2.0)]);
        let b = series("B", &[(1, 1.0), (2, 1.0), (3, 1.0), (4, 1.0), (5, 1.0)]);
        let kpis = ratio_metrics(&a, &b, 2).unwrap().kpis().unwrap();
        assert_eq!(kpis.min_date, d(1));
        assert_eq!(kpis.max_date, d(2));
        assert_relative_eq!(kpis.current, 2.0);
        assert_relative_eq!(kpis.mean, 2.0);
        assert_relative_eq!(kpis.pct_to_mean, 0.0);
    }

    #[test]
    fn test_non_positive_price_rejected() {
        let a = series("A", &[(1, 1.0), (2, 0.0)]);
        let b = series("B", &[(1, 1.0), (2, 1.0)]);
        let err = ratio_metrics(&a, &b, 2).unwrap_err();
        assert!(matches!(err, AnalyticsError::DegenerateDivision { ref series, .. } if series == "A"));
    }

    #[test]
    fn test_zero_window_rejected() {
        let a = series("A", &[(1, 1.0)]);
        assert!(matches!(
            ratio_metrics(&a, &a, 0),
            Err(AnalyticsError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_disjoint_series_are_empty() {
        let a = series("A", &[(1, 1.0)]);
        let b = series("B", &[(2, 1.0)]);
        let metrics = ratio_metrics(&a, &b, 5).unwrap();
        assert!(metrics.is_empty());
        assert!(metrics.static_bands.is_none());
        assert!(metrics.kpis().is_none());
    }

    #[test]
    fn test_single_point_has_median_but_no_bands() {
        let a = series("A", &[(1, 3.0)]);
        let b = series("B", &[(1, 1.5)]);
        let bands = ratio_metrics(&a, &b, 1).unwrap().static_bands.unwrap();
        assert_relative_eq!(bands.median, 2.0);
        assert!(bands.upper_1x.is_none());
    }
}
