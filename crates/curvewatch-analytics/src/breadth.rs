//! Market breadth: share of a universe trading above its own moving average.
//!
//! Each instrument's trailing mean runs over its own observed prices, the
//! current one included. On each date, an instrument counts toward the
//! denominator only if it has a price and a defined mean; it counts toward
//! the numerator if the price is strictly above that mean.

use curvewatch_core::{Date, PriceTable, Series};
use curvewatch_math::histogram::{histogram, Histogram};
use curvewatch_math::rolling::RollingWindow;
use curvewatch_math::stats::median;
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::parallel::{maybe_parallel_map, DEFAULT_PARALLEL_THRESHOLD};

/// Default moving-average length, in observations.
pub const DEFAULT_BREADTH_WINDOW: usize = 200;

/// Default number of histogram bins for distribution views.
pub const DEFAULT_HISTOGRAM_BINS: usize = 50;

/// Parameters of the breadth indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreadthParams {
    /// Moving-average length.
    pub window: usize,
    /// Dates before this are dropped from the output.
    pub start_floor: Option<Date>,
    /// Universes wider than this are processed in parallel when the
    /// `parallel` feature is on.
    pub parallel_threshold: usize,
}

impl Default for BreadthParams {
    fn default() -> Self {
        Self {
            window: DEFAULT_BREADTH_WINDOW,
            start_floor: Date::from_ymd(2014, 1, 1).ok(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// Percentage of the universe above its moving average, per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreadthSeries {
    /// Percentages in `[0, 100]`, ascending by date.
    pub series: Series,
    /// Moving-average length used.
    pub window: usize,
    /// Number of instruments in the input.
    pub universe_size: usize,
}

/// Histogram of breadth readings with the latest reading marked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreadthDistribution {
    /// Bin edges and counts.
    pub histogram: Histogram,
    /// All-time median.
    pub median: f64,
    /// Most recent reading.
    pub current: f64,
}

impl BreadthSeries {
    /// True when no date had any instrument with a defined mean.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// All-time median of the readings.
    #[must_use]
    pub fn median(&self) -> Option<f64> {
        median(&self.series.values())
    }

    /// Most recent reading.
    #[must_use]
    pub fn current(&self) -> Option<(Date, f64)> {
        self.series.last()
    }

    /// Equal-width histogram of the readings.
    pub fn histogram(&self, bins: usize) -> AnalyticsResult<BreadthDistribution> {
        let values = self.series.values();
        let (Some(mid), Some((_, current))) = (median(&values), self.series.last()) else {
            return Err(AnalyticsError::EmptyInput("breadth series has no readings".into()));
        };
        Ok(BreadthDistribution {
            histogram: histogram(&values, bins)?,
            median: mid,
            current,
        })
    }
}

/// Per date: `None` if the instrument has no price or no mean yet,
/// otherwise whether the price is above the mean.
fn above_mean(column: &[Option<f64>], window: usize) -> AnalyticsResult<Vec<Option<bool>>> {
    let mut rolling = RollingWindow::new(window)?;
    Ok(column
        .iter()
        .map(|cell| cell.and_then(|price| rolling.push(price).map(|mean| price > mean)))
        .collect())
}

/// Computes the breadth indicator over a price table.
pub fn market_breadth(table: &PriceTable, params: &BreadthParams) -> AnalyticsResult<BreadthSeries> {
    if params.window == 0 {
        return Err(AnalyticsError::invalid_input("breadth window must be positive"));
    }

    let columns: Vec<&[Option<f64>]> = table.columns().map(|(_, c)| c).collect();
    let flags = maybe_parallel_map(&columns, params.parallel_threshold, |c| {
        above_mean(c, params.window)
    })
    .into_iter()
    .collect::<AnalyticsResult<Vec<_>>>()?;

    let mut series = Series::new("breadth");
    for (i, &date) in table.dates().iter().enumerate() {
        if params.start_floor.is_some_and(|floor| date < floor) {
            continue;
        }
        let (above, defined) = flags
            .iter()
            .filter_map(|f| f[i])
            .fold((0usize, 0usize), |(a, n), up| (a + usize::from(up), n + 1));
        if defined > 0 {
            series.insert(date, above as f64 / defined as f64 * 100.0);
        }
    }

    log::debug!(
        "breadth over {} instruments, window {}: {} dates",
        table.width(),
        params.window,
        series.len()
    );

    Ok(BreadthSeries {
        series,
        window: params.window,
        universe_size: table.width(),
    })
}
