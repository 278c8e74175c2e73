//! Date-indexed numeric series.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Date;

/// A named series with at most one value per date, iterated in ascending
/// date order.
///
/// Used for tenor series, credit index series, price histories and macro
/// series alike. Inserting an existing date replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    name: String,
    points: BTreeMap<Date, f64>,
}

impl Series {
    /// Creates an empty series.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: BTreeMap::new(),
        }
    }

    /// Creates a series from `(date, value)` pairs in any order.
    pub fn from_points(name: impl Into<String>, points: impl IntoIterator<Item = (Date, f64)>) -> Self {
        Self {
            name: name.into(),
            points: points.into_iter().collect(),
        }
    }

    /// Series name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a copy with a different name.
    #[must_use]
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Inserts or replaces the value at `date`.
    pub fn insert(&mut self, date: Date, value: f64) {
        self.points.insert(date, value);
    }

    /// Value at `date`.
    #[must_use]
    pub fn get(&self, date: &Date) -> Option<f64> {
        self.points.get(date).copied()
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the series has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates `(date, value)` in ascending date order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (Date, f64)> + '_ {
        self.points.iter().map(|(d, v)| (*d, *v))
    }

    /// Dates in ascending order.
    #[must_use]
    pub fn dates(&self) -> Vec<Date> {
        self.points.keys().copied().collect()
    }

    /// Values in date order.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.points.values().copied().collect()
    }

    /// Earliest point.
    #[must_use]
    pub fn first(&self) -> Option<(Date, f64)> {
        self.iter().next()
    }

    /// Latest point.
    #[must_use]
    pub fn last(&self) -> Option<(Date, f64)> {
        self.iter().next_back()
    }

    /// Points with `start <= date <= end`.
    #[must_use]
    pub fn between(&self, start: Date, end: Date) -> Self {
        if start > end {
            return Self::new(self.name.clone());
        }
        Self {
            name: self.name.clone(),
            points: self
                .points
                .range(start..=end)
                .map(|(d, v)| (*d, *v))
                .collect(),
        }
    }

    /// The last `days` calendar days, counted back from the latest point.
    /// A span reaching past the supported date range keeps everything.
    #[must_use]
    pub fn trailing(&self, days: i64) -> Self {
        match self.last() {
            Some((end, _)) => match end.checked_add_days(days.saturating_neg()) {
                Ok(start) => self.between(start, end),
                Err(_) => self.clone(),
            },
            None => self.clone(),
        }
    }

    /// Dates present in both series with both values, ascending.
    #[must_use]
    pub fn inner_join(&self, other: &Series) -> Vec<(Date, f64, f64)> {
        self.points
            .iter()
            .filter_map(|(date, a)| other.points.get(date).map(|b| (*date, *a, *b)))
            .collect()
    }
}

impl FromIterator<(Date, f64)> for Series {
    fn from_iter<I: IntoIterator<Item = (Date, f64)>>(iter: I) -> Self {
        Self::from_points(String::new(), iter)
    }
}
