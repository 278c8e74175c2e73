//! Multi-series alignment: spreads between two series and forward-filled
//! panels of macro indicators.

use std::collections::BTreeSet;

use curvewatch_core::{Date, Series};
use serde::{Deserialize, Serialize};

/// `a − b` on the dates both series share. Named `"A - B"`.
#[must_use]
pub fn spread_between(a: &Series, b: &Series) -> Series {
    Series::from_points(
        format!("{} - {}", a.name(), b.name()),
        a.inner_join(b).into_iter().map(|(date, x, y)| (date, x - y)),
    )
}

/// Named series aligned on the union of their dates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesPanel {
    names: Vec<String>,
    dates: Vec<Date>,
    /// `rows[d][s]` is series `s` on `dates[d]`.
    rows: Vec<Vec<Option<f64>>>,
}

impl SeriesPanel {
    /// Outer-joins `series` by date. Cells are `None` where a series has no
    /// value.
    #[must_use]
    pub fn outer_join(series: &[Series]) -> Self {
        let dates: Vec<Date> = series
            .iter()
            .flat_map(Series::dates)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let rows = dates
            .iter()
            .map(|date| series.iter().map(|s| s.get(date)).collect())
            .collect();
        Self {
            names: series.iter().map(|s| s.name().to_string()).collect(),
            dates,
            rows,
        }
    }

    /// Carries each series' last value forward into later gaps. Gaps before
    /// a series' first value stay empty.
    #[must_use]
    pub fn forward_fill(mut self) -> Self {
        let mut last: Vec<Option<f64>> = vec![None; self.names.len()];
        for row in &mut self.rows {
            for (cell, prev) in row.iter_mut().zip(last.iter_mut()) {
                match cell {
                    Some(v) => *prev = Some(*v),
                    None => *cell = *prev,
                }
            }
        }
        self
    }

    /// Drops every date that still has a missing cell.
    #[must_use]
    pub fn drop_incomplete(mut self) -> Self {
        let (dates, rows): (Vec<Date>, Vec<Vec<Option<f64>>>) = self
            .dates
            .into_iter()
            .zip(self.rows)
            .filter(|(_, row)| row.iter().all(Option::is_some))
            .unzip();
        self.dates = dates;
        self.rows = rows;
        self
    }

    /// Outer join, forward fill, then drop rows with leading gaps.
    #[must_use]
    pub fn aligned(series: &[Series]) -> Self {
        Self::outer_join(series).forward_fill().drop_incomplete()
    }

    /// Keeps only the last `n` rows.
    #[must_use]
    pub fn last_rows(mut self, n: usize) -> Self {
        let skip = self.dates.len().saturating_sub(n);
        self.dates.drain(..skip);
        self.rows.drain(..skip);
        self
    }

    /// Series names in column order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Row dates, ascending.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Iterates `(date, cells)` rows.
    pub fn rows(&self) -> impl Iterator<Item = (Date, &[Option<f64>])> {
        self.dates.iter().copied().zip(self.rows.iter().map(Vec::as_slice))
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// True when the panel has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// One column as a series, skipping empty cells.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Series> {
        let idx = self.names.iter().position(|n| n == name)?;
        Some(Series::from_points(
            name,
            self.rows()
                .filter_map(|(date, cells)| cells[idx].map(|v| (date, v))),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(m: u32) -> Date {
        Date::from_ymd(2024, m, 1).unwrap()
    }

    #[test]
    fn test_spread_between_inner_join() {
        let br = Series::from_points("BR10Y", vec![(d(1), 6.5), (d(2), 6.7), (d(3), 6.9)]);
        let us = Series::from_points("DGS10", vec![(d(2), 4.2), (d(3), 4.4), (d(4), 4.5)]);
        let spread = spread_between(&br, &us);
        assert_eq!(spread.name(), "BR10Y - DGS10");
        assert_eq!(spread.dates(), vec![d(2), d(3)]);
        assert_relative_eq!(spread.get(&d(2)).unwrap(), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_aligned_panel() {
        let monthly = Series::from_points("IPCA", vec![(d(1), 0.4), (d(3), 0.5)]);
        let late = Series::from_points("Credit/GDP", vec![(d(2), 53.0), (d(4), 54.0)]);
        let panel = SeriesPanel::aligned(&[monthly, late]);

        assert_eq!(panel.dates(), &[d(2), d(3), d(4)]);
        let rows: Vec<Vec<Option<f64>>> = panel.rows().map(|(_, r)| r.to_vec()).collect();
        assert_eq!(rows[0], vec![Some(0.4), Some(53.0)]);
        assert_eq!(rows[1], vec![Some(0.5), Some(53.0)]);
        assert_eq!(rows[2], vec![Some(0.5), Some(54.0)]);
    }

    #[test]
    fn test_outer_join_keeps_gaps() {
        let a = Series::from_points("a", vec![(d(1), 1.0)]);
        let b = Series::from_points("b", vec![(d(2), 2.0)]);
        let panel = SeriesPanel::outer_join(&[a, b]);
        assert_eq!(panel.len(), 2);
        assert_eq!(panel.column("a").unwrap().len(), 1);
        assert!(SeriesPanel::aligned(&[]).is_empty());
    }

    #[test]
    fn test_last_rows() {
        let a = Series::from_points("a", vec![(d(1), 1.0), (d(2), 2.0), (d(3), 3.0)]);
        let panel = SeriesPanel::outer_join(&[a]).last_rows(2);
        assert_eq!(panel.dates(), &[d(2), d(3)]);
        assert_eq!(panel.column("a").unwrap().values(), vec![2.0, 3.0]);
        assert_eq!(panel.clone().last_rows(10).len(), 2);
    }
}
