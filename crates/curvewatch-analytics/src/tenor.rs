//! Nearest-to-horizon maturity selection.
//!
//! A quote date plus a horizon gives a target date; the matcher picks the
//! available maturity with the smallest absolute day distance to it. Ties
//! are broken by an explicit [`TieBreak`] rule rather than by input order
//! alone.

use std::cmp::Ordering;

use curvewatch_core::dataset::QuoteTable;
use curvewatch_core::{Date, InstrumentType, Series};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};

/// How to choose between maturities equally distant from the target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Keep the candidate that appears first in the input.
    #[default]
    FirstEncountered,
    /// Prefer the earlier maturity.
    EarlierMaturity,
    /// Prefer the later maturity.
    LaterMaturity,
}

impl TieBreak {
    /// Orders two equally distant candidates; `Less` means `a` wins.
    /// `FirstEncountered` compares equal, leaving input order to decide.
    fn compare(self, a: Date, b: Date) -> Ordering {
        match self {
            TieBreak::FirstEncountered => Ordering::Equal,
            TieBreak::EarlierMaturity => a.cmp(&b),
            TieBreak::LaterMaturity => b.cmp(&a),
        }
    }
}

/// The target date for a horizon: `quote_date` plus whole calendar years.
/// February 29 clamps to February 28 in non-leap target years.
pub fn horizon_target(quote_date: Date, horizon_years: i32) -> AnalyticsResult<Date> {
    Ok(quote_date.add_years(horizon_years)?)
}

/// The maturity closest to `target`.
///
/// The result is always a member of `maturities` and no other member is
/// strictly closer.
pub fn nearest_to(maturities: &[Date], target: Date, tie_break: TieBreak) -> AnalyticsResult<Date> {
    let mut best: Option<(i64, Date)> = None;
    for &candidate in maturities {
        let distance = candidate.abs_days_between(&target);
        let better = match best {
            None => true,
            Some((best_distance, best_date)) => distance
                .cmp(&best_distance)
                .then_with(|| tie_break.compare(candidate, best_date))
                .is_lt(),
        };
        if better {
            best = Some((distance, candidate));
        }
    }
    best.map(|(_, date)| date)
        .ok_or_else(|| AnalyticsError::empty_universe(format!("target {target}")))
}

/// The maturity closest to `quote_date + horizon_years`.
pub fn nearest_maturity(
    maturities: &[Date],
    quote_date: Date,
    horizon_years: i32,
    tie_break: TieBreak,
) -> AnalyticsResult<Date> {
    let target = horizon_target(quote_date, horizon_years)?;
    nearest_to(maturities, target, tie_break)
}

/// One day of a tenor series: the selected bond and its rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TenorPoint {
    /// Quote date.
    pub quote_date: Date,
    /// Maturity selected for this date.
    pub maturity_date: Date,
    /// Purchase rate of the selected bond, % p.a.
    pub purchase_rate: f64,
}

/// Purchase rate of the nearest-to-horizon bond of one type, per date.
///
/// Points are strictly increasing by quote date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenorSeries {
    /// Instrument type the series was built from.
    pub instrument_type: InstrumentType,
    /// Horizon in years.
    pub horizon_years: i32,
    /// Selected points, ascending by date.
    pub points: Vec<TenorPoint>,
}

impl TenorSeries {
    /// True when no date produced a point.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most recent point.
    #[must_use]
    pub fn last(&self) -> Option<&TenorPoint> {
        self.points.last()
    }

    /// The rates as a plain date series, named e.g. `"IPCA+ com Juros Semestrais 10y"`.
    #[must_use]
    pub fn to_series(&self) -> Series {
        Series::from_points(
            format!("{} {}y", self.instrument_type.short_name(), self.horizon_years),
            self.points.iter().map(|p| (p.quote_date, p.purchase_rate)),
        )
    }
}

/// Builds the tenor series of `instrument_type` for `horizon_years`.
///
/// Dates without any maturity of that type are skipped.
pub fn tenor_series(
    table: &QuoteTable,
    instrument_type: &InstrumentType,
    horizon_years: i32,
    tie_break: TieBreak,
) -> AnalyticsResult<TenorSeries> {
    let types = [instrument_type.clone()];
    let mut points = Vec::new();

    for snapshot in table.snapshots(&types) {
        let maturities = snapshot.maturities(instrument_type);
        let maturity = match nearest_maturity(
            &maturities,
            snapshot.quote_date(),
            horizon_years,
            tie_break,
        ) {
            Ok(m) => m,
            Err(AnalyticsError::EmptyUniverse(_)) => {
                log::debug!("no {instrument_type} maturities on {}", snapshot.quote_date());
                continue;
            }
            Err(e) => return Err(e),
        };
        if let Some(record) = snapshot.find(instrument_type, maturity) {
            points.push(TenorPoint {
                quote_date: snapshot.quote_date(),
                maturity_date: maturity,
                purchase_rate: record.purchase_rate,
            });
        }
    }

    log::debug!(
        "tenor series {instrument_type} {horizon_years}y: {} points",
        points.len()
    );

    Ok(TenorSeries {
        instrument_type: instrument_type.clone(),
        horizon_years,
        points,
    })
}
