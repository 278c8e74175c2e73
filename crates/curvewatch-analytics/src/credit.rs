//! Weighted credit index spreads.
//!
//! Each index date is reduced to `Σ(w·s) / Σw` over the constituents left
//! after issuer exclusions. A date whose remaining weights sum to zero gets
//! exactly `0`. Accumulation is a single keyed pass, so row order does not
//! matter.

use std::collections::{BTreeMap, HashSet};

use curvewatch_core::{CreditConstituent, Date, Series};
use serde::{Deserialize, Serialize};

use crate::panel::SeriesPanel;

/// Issuers removed from the general and low-rated CDI indices.
pub const DEFAULT_EXCLUDED_ISSUERS: [&str; 4] = [
    "AMERICANAS SA",
    "Light - Servicos de Eletricidade",
    "Aeris",
    "Viveo",
];

/// Weighted-average spread per date for one index.
///
/// Returns a series named `name`, ascending by date.
pub fn aggregate(
    name: impl Into<String>,
    constituents: &[CreditConstituent],
    excluded_issuers: &[String],
) -> Series {
    let excluded: HashSet<&str> = excluded_issuers.iter().map(String::as_str).collect();
    let mut sums: BTreeMap<Date, (f64, f64)> = BTreeMap::new();
    let mut dropped = 0usize;

    for row in constituents {
        if excluded.contains(row.issuer_id.as_str()) {
            dropped += 1;
            continue;
        }
        let entry = sums.entry(row.quote_date).or_insert((0.0, 0.0));
        entry.0 += row.weight_pct * row.spread_value;
        entry.1 += row.weight_pct;
    }

    let name = name.into();
    if dropped > 0 {
        log::debug!("{name}: excluded {dropped} constituent rows");
    }

    Series::from_points(
        name,
        sums.into_iter().map(|(date, (weighted, weight))| {
            let spread = if weight == 0.0 { 0.0 } else { weighted / weight };
            (date, spread)
        }),
    )
}

/// One credit index definition: a name and its exclusion list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSpec {
    /// Display name of the index.
    pub name: String,
    /// Issuers removed before aggregation.
    #[serde(default)]
    pub excluded_issuers: Vec<String>,
}

impl IndexSpec {
    /// An index without exclusions.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            excluded_issuers: Vec::new(),
        }
    }

    /// Sets the exclusion list.
    #[must_use]
    pub fn excluding<S: Into<String>>(mut self, issuers: impl IntoIterator<Item = S>) -> Self {
        self.excluded_issuers = issuers.into_iter().map(Into::into).collect();
        self
    }
}

/// Aggregates each index from its own constituents and outer-joins the
/// results by date. A cell is `None` where an index has no value.
#[must_use]
pub fn credit_panel(indices: &[(IndexSpec, &[CreditConstituent])]) -> SeriesPanel {
    let series: Vec<Series> = indices
        .iter()
        .map(|(spec, rows)| aggregate(spec.name.clone(), rows, &spec.excluded_issuers))
        .collect();
    SeriesPanel::outer_join(&series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(day: u32) -> Date {
        Date::from_ymd(2025, 3, day).unwrap()
    }

    fn row(date: Date, issuer: &str, weight: f64, spread: f64) -> CreditConstituent {
        CreditConstituent::new(date, issuer, weight, spread)
    }

    #[test]
    fn test_weighted_average() {
        let rows = vec![row(d(3), "A", 30.0, 2.0), row(d(3), "B", 70.0, 4.0)];
        let series = aggregate("IDEX", &rows, &[]);
        assert_relative_eq!(series.get(&d(3)).unwrap(), 3.4, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_weight_sum_is_zero() {
        let rows = vec![row(d(3), "A", 0.0, 2.0), row(d(3), "B", 0.0, 4.0)];
        assert_eq!(aggregate("IDEX", &rows, &[]).get(&d(3)), Some(0.0));
    }

    #[test]
    fn test_exclusions_renormalize() {
        let rows = vec![
            row(d(3), "A", 30.0, 2.0),
            row(d(3), "AMERICANAS SA", 70.0, 90.0),
        ];
        let excluded: Vec<String> = DEFAULT_EXCLUDED_ISSUERS.iter().map(|s| (*s).to_string()).collect();
        let series = aggregate("IDEX", &rows, &excluded);
        assert_relative_eq!(series.get(&d(3)).unwrap(), 2.0);
    }

    #[test]
    fn test_fully_excluded_date_is_absent() {
        let rows = vec![row(d(3), "X", 10.0, 2.0), row(d(4), "A", 10.0, 1.0)];
        let series = aggregate("IDEX", &rows, &["X".to_string()]);
        assert_eq!(series.dates(), vec![d(4)]);
    }

    #[test]
    fn test_order_independent() {
        let mut rows = vec![
            row(d(4), "A", 10.0, 1.0),
            row(d(3), "B", 20.0, 2.0),
            row(d(3), "C", 30.0, 3.0),
        ];
        let forward = aggregate("IDEX", &rows, &[]);
        rows.reverse();
        assert_eq!(forward, aggregate("IDEX", &rows, &[]));
    }

    #[test]
    fn test_panel_outer_join() {
        let general = vec![row(d(3), "A", 1.0, 2.0), row(d(4), "A", 1.0, 2.5)];
        let low_rated = vec![row(d(4), "B", 1.0, 5.0), row(d(5), "B", 1.0, 6.0)];
        let panel = credit_panel(&[
            (IndexSpec::new("general"), general.as_slice()),
            (IndexSpec::new("low rated"), low_rated.as_slice()),
        ]);
        assert_eq!(panel.names(), &["general".to_string(), "low rated".to_string()]);
        let rows: Vec<Vec<Option<f64>>> = panel.rows().map(|(_, r)| r.to_vec()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec![Some(2.0), None]);
        assert_eq!(rows[1], vec![Some(2.5), Some(5.0)]);
        assert_eq!(rows[2], vec![None, Some(6.0)]);
        assert_eq!(panel.column("low rated").unwrap().len(), 2);
        assert!(panel.column("missing").is_none());
    }
}
