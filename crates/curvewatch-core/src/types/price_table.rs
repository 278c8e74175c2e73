//! Instrument × date price matrix.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::{Date, Series};

/// Adjusted close prices for a universe of tickers on a shared date index.
///
/// Rows are the union of all observation dates in ascending order; a cell is
/// `None` when a ticker has no price on that date. Tickers are kept sorted,
/// so the table is identical regardless of the order observations arrive in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    dates: Vec<Date>,
    tickers: Vec<String>,
    /// `columns[t][d]` is the price of `tickers[t]` on `dates[d]`.
    columns: Vec<Vec<Option<f64>>>,
}

impl PriceTable {
    /// Builds a table from `(ticker, date, price)` observations.
    ///
    /// Non-finite prices are treated as missing. A repeated
    /// `(ticker, date)` keeps the last value seen.
    pub fn from_observations<S: Into<String>>(
        observations: impl IntoIterator<Item = (S, Date, f64)>,
    ) -> Self {
        let mut by_ticker: BTreeMap<String, BTreeMap<Date, f64>> = BTreeMap::new();
        let mut all_dates = BTreeSet::new();

        for (ticker, date, price) in observations {
            if !price.is_finite() {
                continue;
            }
            all_dates.insert(date);
            by_ticker.entry(ticker.into()).or_default().insert(date, price);
        }

        let dates: Vec<Date> = all_dates.into_iter().collect();
        let mut tickers = Vec::with_capacity(by_ticker.len());
        let mut columns = Vec::with_capacity(by_ticker.len());
        for (ticker, prices) in by_ticker {
            columns.push(dates.iter().map(|d| prices.get(d).copied()).collect());
            tickers.push(ticker);
        }

        Self {
            dates,
            tickers,
            columns,
        }
    }

    /// Builds a table from one series per ticker (the series name is the
    /// ticker).
    pub fn from_series(series: impl IntoIterator<Item = Series>) -> Self {
        let observations: Vec<(String, Date, f64)> = series
            .into_iter()
            .flat_map(|s| {
                let name = s.name().to_string();
                s.iter()
                    .map(|(d, v)| (name.clone(), d, v))
                    .collect::<Vec<_>>()
            })
            .collect();
        Self::from_observations(observations)
    }

    /// Row dates, ascending.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Column tickers, sorted.
    #[must_use]
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    /// Number of tickers.
    #[must_use]
    pub fn width(&self) -> usize {
        self.tickers.len()
    }

    /// True when there are no prices at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// The column for one ticker, aligned with `dates()`.
    #[must_use]
    pub fn column(&self, ticker: &str) -> Option<&[Option<f64>]> {
        self.tickers
            .iter()
            .position(|t| t == ticker)
            .map(|i| self.columns[i].as_slice())
    }

    /// Iterates `(ticker, column)` pairs.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> {
        self.tickers
            .iter()
            .zip(&self.columns)
            .map(|(t, c)| (t.as_str(), c.as_slice()))
    }

    /// One ticker's prices as a series, without missing cells.
    #[must_use]
    pub fn series(&self, ticker: &str) -> Option<Series> {
        self.column(ticker).map(|column| {
            Series::from_points(
                ticker,
                self.dates
                    .iter()
                    .zip(column)
                    .filter_map(|(d, v)| v.map(|v| (*d, v))),
            )
        })
    }

    /// Sub-table with the given tickers; unknown tickers are skipped.
    #[must_use]
    pub fn select(&self, tickers: &[impl AsRef<str>]) -> Self {
        let observations: Vec<(String, Date, f64)> = tickers
            .iter()
            .filter_map(|t| self.series(t.as_ref()))
            .flat_map(|s| {
                let name = s.name().to_string();
                s.iter()
                    .map(|(d, v)| (name.clone(), d, v))
                    .collect::<Vec<_>>()
            })
            .collect();
        Self::from_observations(observations)
    }

    /// Sub-table restricted to `start <= date <= end`.
    #[must_use]
    pub fn between(&self, start: Date, end: Date) -> Self {
        let keep: Vec<usize> = self
            .dates
            .iter()
            .enumerate()
            .filter(|(_, d)| **d >= start && **d <= end)
            .map(|(i, _)| i)
            .collect();

        let observations = self.columns().flat_map(|(ticker, column)| {
            keep.iter()
                .filter_map(|&i| column[i].map(|v| (ticker.to_string(), self.dates[i], v)))
                .collect::<Vec<_>>()
        });
        Self::from_observations(observations.collect::<Vec<_>>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> Date {
        Date::from_ymd(2025, 1, day).unwrap()
    }

    #[test]
    fn test_union_of_dates() {
        let table = PriceTable::from_observations(vec![
            ("B", d(2), 20.0),
            ("A", d(1), 10.0),
            ("A", d(3), 11.0),
        ]);
        assert_eq!(table.dates(), &[d(1), d(2), d(3)]);
        assert_eq!(table.tickers(), &["A".to_string(), "B".to_string()]);
        assert_eq!(table.column("A").unwrap(), &[Some(10.0), None, Some(11.0)]);
        assert_eq!(table.column("B").unwrap(), &[None, Some(20.0), None]);
        assert!(table.column("C").is_none());
    }

    #[test]
    fn test_order_independent() {
        let forward = vec![("A", d(1), 1.0), ("B", d(1), 2.0), ("A", d(2), 3.0)];
        let mut backward = forward.clone();
        backward.reverse();
        assert_eq!(
            PriceTable::from_observations(forward),
            PriceTable::from_observations(backward)
        );
    }

    #[test]
    fn test_non_finite_is_missing() {
        let table = PriceTable::from_observations(vec![("A", d(1), f64::NAN), ("A", d(2), 1.0)]);
        assert_eq!(table.dates(), &[d(2)]);
    }

    #[test]
    fn test_select_and_between() {
        let table = PriceTable::from_observations(vec![
            ("A", d(1), 1.0),
            ("B", d(2), 2.0),
            ("C", d(3), 3.0),
        ]);
        let selected = table.select(&["C", "A", "Z"]);
        assert_eq!(selected.tickers(), &["A".to_string(), "C".to_string()]);

        let window = table.between(d(2), d(3));
        assert_eq!(window.dates(), &[d(2), d(3)]);
        assert_eq!(window.width(), 2);
    }

    #[test]
    fn test_series_skips_missing() {
        let table = PriceTable::from_observations(vec![("A", d(1), 1.0), ("B", d(2), 2.0)]);
        let a = table.series("A").unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(a.name(), "A");
    }
}
