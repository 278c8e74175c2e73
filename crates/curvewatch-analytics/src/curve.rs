//! Multi-date yield curve snapshots.
//!
//! Offsets are resolved against the most recent quote date of the chosen
//! instrument type. Each resolves to the latest quote date on or before its
//! target; a date is never synthesized. When two offsets land on the same
//! quote date, the first label wins and the later one is dropped.

use std::fmt;

use curvewatch_core::calendars::Calendar;
use curvewatch_core::dataset::{QuoteSnapshot, QuoteTable};
use curvewatch_core::{Date, InstrumentType};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};

/// A backwards offset from the anchor (most recent) quote date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "unit", content = "count", rename_all = "snake_case")]
pub enum CurveOffset {
    /// Calendar days back.
    Days(u32),
    /// Weeks back.
    Weeks(u32),
    /// Calendar months back, clamped to month end.
    Months(u32),
    /// Years back; February 29 clamps to February 28.
    Years(u32),
}

impl CurveOffset {
    /// The offset as of zero days.
    pub const TODAY: CurveOffset = CurveOffset::Days(0);

    /// Target date for this offset from `anchor`.
    /// Offsets reaching outside the supported date range are an error.
    pub fn target(self, anchor: Date) -> AnalyticsResult<Date> {
        let back = |n: u32| {
            i32::try_from(n)
                .map(|n| -n)
                .map_err(|_| AnalyticsError::InvalidDate(format!("offset '{self}' is out of range")))
        };
        Ok(match self {
            CurveOffset::Days(n) => anchor.checked_add_days(-i64::from(n))?,
            CurveOffset::Weeks(n) => anchor.checked_add_days(-7 * i64::from(n))?,
            CurveOffset::Months(n) => anchor.add_months(back(n)?)?,
            CurveOffset::Years(n) => anchor.add_years(back(n)?)?,
        })
    }
}

impl fmt::Display for CurveOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (n, unit) = match *self {
            CurveOffset::Days(0) => return write!(f, "today"),
            CurveOffset::Days(n) => (n, "day"),
            CurveOffset::Weeks(n) => (n, "week"),
            CurveOffset::Months(n) => (n, "month"),
            CurveOffset::Years(n) => (n, "year"),
        };
        let plural = if n == 1 { "" } else { "s" };
        write!(f, "{n} {unit}{plural} ago")
    }
}

/// An offset with a display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedOffset {
    /// Label shown for the resulting curve.
    pub label: String,
    /// Offset from the anchor date.
    pub offset: CurveOffset,
}

impl NamedOffset {
    /// Creates a named offset.
    #[must_use]
    pub fn new(label: impl Into<String>, offset: CurveOffset) -> Self {
        Self {
            label: label.into(),
            offset,
        }
    }
}

impl From<CurveOffset> for NamedOffset {
    fn from(offset: CurveOffset) -> Self {
        let label = match offset {
            CurveOffset::TODAY => "Today".to_string(),
            other => {
                let text = other.to_string();
                let mut chars = text.chars();
                match chars.next() {
                    Some(c) => c.to_uppercase().chain(chars).collect(),
                    None => text,
                }
            }
        };
        Self { label, offset }
    }
}

/// Today and each of the last five calendar days.
#[must_use]
pub fn short_horizon_offsets() -> Vec<NamedOffset> {
    (0..=5).map(|n| CurveOffset::Days(n).into()).collect()
}

/// Today, one week, one, three and six months, and one year ago.
#[must_use]
pub fn long_horizon_offsets() -> Vec<NamedOffset> {
    [
        CurveOffset::TODAY,
        CurveOffset::Weeks(1),
        CurveOffset::Months(1),
        CurveOffset::Months(3),
        CurveOffset::Months(6),
        CurveOffset::Years(1),
    ]
    .into_iter()
    .map(NamedOffset::from)
    .collect()
}

/// One point of a curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Bond maturity.
    pub maturity_date: Date,
    /// Business days in `[quote_date, maturity_date)`.
    pub business_days: i64,
    /// Purchase rate, % p.a.
    pub purchase_rate: f64,
}

/// A curve on one resolved quote date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveSnapshot {
    /// Label of the offset that produced this curve.
    pub label: String,
    /// Date the offset asked for.
    pub target_date: Date,
    /// Quote date actually used (`<= target_date`).
    pub quote_date: Date,
    /// Points in ascending maturity order.
    pub points: Vec<CurvePoint>,
}

/// The curve of one instrument type on one snapshot, ordered by maturity.
pub fn curve_points(
    snapshot: &QuoteSnapshot<'_>,
    instrument_type: &InstrumentType,
    calendar: &dyn Calendar,
) -> Vec<CurvePoint> {
    let quote_date = snapshot.quote_date();
    let mut points: Vec<CurvePoint> = snapshot
        .of_type(instrument_type)
        .map(|r| CurvePoint {
            maturity_date: r.maturity_date,
            business_days: calendar.business_days_between(quote_date, r.maturity_date),
            purchase_rate: r.purchase_rate,
        })
        .collect();
    points.sort_by_key(|p| p.maturity_date);
    points
}

/// Resolves each offset to the latest available date on or before its
/// target. Offsets with no such date, or resolving to an already used
/// date, are dropped.
pub fn resolve_offsets(
    available: &[Date],
    offsets: &[NamedOffset],
) -> AnalyticsResult<Vec<(NamedOffset, Date, Date)>> {
    let Some(&anchor) = available.iter().max() else {
        return Ok(Vec::new());
    };

    let mut resolved: Vec<(NamedOffset, Date, Date)> = Vec::with_capacity(offsets.len());
    for named in offsets {
        let target = named.offset.target(anchor)?;
        let Some(&actual) = available.iter().filter(|d| **d <= target).max() else {
            log::debug!("curve offset '{}': no quote on or before {target}", named.label);
            continue;
        };
        if resolved.iter().any(|(_, _, used)| *used == actual) {
            log::debug!("curve offset '{}' resolves to {actual}, already shown", named.label);
            continue;
        }
        resolved.push((named.clone(), target, actual));
    }
    Ok(resolved)
}

/// Builds one curve per resolved offset for `instrument_type`.
///
/// Empty when the table has no quotes of that type.
pub fn curve_snapshots(
    table: &QuoteTable,
    instrument_type: &InstrumentType,
    offsets: &[NamedOffset],
    calendar: &dyn Calendar,
) -> AnalyticsResult<Vec<CurveSnapshot>> {
    let available = table.quote_dates(std::slice::from_ref(instrument_type));

    Ok(resolve_offsets(&available, offsets)?
        .into_iter()
        .map(|(named, target_date, quote_date)| CurveSnapshot {
            label: named.label,
            target_date,
            quote_date,
            points: curve_points(&table.snapshot(quote_date), instrument_type, calendar),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use curvewatch_core::calendars::WeekendCalendar;
    use curvewatch_core::QuoteRecord;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_offset_labels() {
        let labels: Vec<String> = long_horizon_offsets().into_iter().map(|o| o.label).collect();
        assert_eq!(
            labels,
            vec!["Today", "1 week ago", "1 month ago", "3 months ago", "6 months ago", "1 year ago"]
        );
        assert_eq!(short_horizon_offsets().len(), 6);
    }

    #[test]
    fn test_resolution_never_later_than_target() {
        // Friday 2025-01-10 back to Monday 2025-01-06; weekend missing.
        let available = vec![d(2025, 1, 6), d(2025, 1, 7), d(2025, 1, 8), d(2025, 1, 9), d(2025, 1, 10)];
        let resolved = resolve_offsets(&available, &short_horizon_offsets()).unwrap();
        for (_, target, actual) in &resolved {
            assert!(actual <= target);
        }
        let dates: Vec<Date> = resolved.iter().map(|(_, _, a)| *a).collect();
        assert_eq!(dates, vec![d(2025, 1, 10), d(2025, 1, 9), d(2025, 1, 8), d(2025, 1, 7), d(2025, 1, 6)]);
    }

    #[test]
    fn test_duplicate_resolution_keeps_first_label() {
        // Monday anchor: every offset from 1 to 3 days lands on Friday.
        let available = vec![d(2025, 1, 10), d(2025, 1, 13)];
        let resolved = resolve_offsets(&available, &short_horizon_offsets()).unwrap();
        let labels: Vec<&str> = resolved.iter().map(|(o, _, _)| o.label.as_str()).collect();
        assert_eq!(labels, vec!["Today", "1 day ago"]);
        assert_eq!(resolved[1].2, d(2025, 1, 10));
    }

    #[test]
    fn test_curve_points_use_business_days() {
        let table = QuoteTable::from_records(vec![
            QuoteRecord::new(InstrumentType::Prefixado, d(2025, 1, 6), d(2025, 1, 20), 13.0, dec!(1)),
            QuoteRecord::new(InstrumentType::Prefixado, d(2025, 1, 6), d(2025, 1, 13), 12.0, dec!(1)),
            QuoteRecord::new(InstrumentType::Ipca, d(2025, 1, 6), d(2025, 1, 8), 7.0, dec!(1)),
        ]);
        let curves = curve_snapshots(
            &table,
            &InstrumentType::Prefixado,
            &[NamedOffset::from(CurveOffset::TODAY)],
            &WeekendCalendar,
        )
        .unwrap();
        assert_eq!(curves.len(), 1);
        let points = &curves[0].points;
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].business_days, 5);
        assert_eq!(points[1].business_days, 10);
    }

    #[test]
    fn test_huge_offsets_fail_cleanly() {
        let anchor = Date::from_ymd(2025, 6, 2).unwrap();
        for offset in [
            CurveOffset::Days(u32::MAX),
            CurveOffset::Weeks(u32::MAX),
            CurveOffset::Months(u32::MAX),
            CurveOffset::Years(u32::MAX),
        ] {
            assert!(matches!(offset.target(anchor), Err(AnalyticsError::InvalidDate(_))));
        }

        let offsets = vec![NamedOffset::new("far", CurveOffset::Days(u32::MAX))];
        assert!(resolve_offsets(&[anchor], &offsets).is_err());
    }

    #[test]
    fn test_no_quotes_no_curves() {
        let curves = curve_snapshots(
            &QuoteTable::default(),
            &InstrumentType::Prefixado,
            &long_horizon_offsets(),
            &WeekendCalendar,
        )
        .unwrap();
        assert!(curves.is_empty());
    }
}
