//! Implied inflation (breakeven) from nominal and inflation-linked bonds.
//!
//! For every fixed-rate maturity quoted on a date, the nearest
//! inflation-linked maturity is paired with it when the two are close
//! enough, and the Fisher relation gives the implied inflation:
//!
//! ```text
//! breakeven = ((1 + fixed / 100) / (1 + linked / 100) - 1) * 100
//! ```

use std::collections::HashSet;

use curvewatch_core::dataset::{QuoteSnapshot, QuoteTable};
use curvewatch_core::{Date, InstrumentType, QuoteRecord};
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsResult;
use crate::tenor::{nearest_to, TieBreak};

/// Maximum calendar-day gap (exclusive) between paired maturities.
pub const DEFAULT_MAX_GAP_DAYS: i64 = 550;

/// Pairing rules for the breakeven calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakevenParams {
    /// Pairs whose maturities are this many days apart or more are dropped.
    pub max_gap_days: i64,
    /// Nominal bond types to price against.
    pub fixed_types: Vec<InstrumentType>,
    /// Inflation-linked types, highest priority first. When two variants
    /// share a maturity, the earlier one in this list is used.
    pub linked_priority: Vec<InstrumentType>,
    /// Tie rule for equally distant linked maturities.
    pub tie_break: TieBreak,
}

impl Default for BreakevenParams {
    fn default() -> Self {
        Self {
            max_gap_days: DEFAULT_MAX_GAP_DAYS,
            fixed_types: vec![InstrumentType::Prefixado],
            linked_priority: vec![InstrumentType::IpcaJurosSemestrais, InstrumentType::Ipca],
            tie_break: TieBreak::FirstEncountered,
        }
    }
}

/// One fixed/linked pair and its implied inflation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakevenPoint {
    /// Quote date of both legs.
    pub quote_date: Date,
    /// Nominal bond type.
    pub fixed_type: InstrumentType,
    /// Nominal bond maturity.
    pub fixed_maturity: Date,
    /// Nominal purchase rate, % p.a.
    pub fixed_rate: f64,
    /// Linked bond type.
    pub linked_type: InstrumentType,
    /// Linked bond maturity.
    pub linked_maturity: Date,
    /// Real purchase rate, % p.a.
    pub linked_rate: f64,
    /// Implied inflation, % p.a.
    pub breakeven: f64,
}

impl BreakevenPoint {
    /// Absolute day gap between the two maturities.
    #[must_use]
    pub fn gap_days(&self) -> i64 {
        self.fixed_maturity.abs_days_between(&self.linked_maturity)
    }
}

/// Implied inflation from a nominal and a real rate, both in % p.a.
///
/// ```
/// use curvewatch_analytics::breakeven::breakeven_rate;
///
/// assert!((breakeven_rate(10.0, 5.0) - 4.761_904_761_9).abs() < 1e-9);
/// ```
#[must_use]
pub fn breakeven_rate(fixed_rate: f64, linked_rate: f64) -> f64 {
    ((1.0 + fixed_rate / 100.0) / (1.0 + linked_rate / 100.0) - 1.0) * 100.0
}

/// One linked record per maturity, chosen by type priority. Candidates keep
/// priority order, then load order, so first-encountered ties favour the
/// preferred variant.
fn linked_candidates<'a>(
    snapshot: &QuoteSnapshot<'a>,
    priority: &[InstrumentType],
) -> Vec<&'a QuoteRecord> {
    let mut seen = HashSet::new();
    priority
        .iter()
        .flat_map(|kind| snapshot.of_type(kind).collect::<Vec<_>>())
        .filter(|r| seen.insert(r.maturity_date))
        .collect()
}

/// Breakevens for every fixed-rate maturity in one snapshot, ascending by
/// fixed maturity. Empty when either side has no quotes.
pub fn implied_inflation(
    snapshot: &QuoteSnapshot<'_>,
    params: &BreakevenParams,
) -> AnalyticsResult<Vec<BreakevenPoint>> {
    let linked = linked_candidates(snapshot, &params.linked_priority);
    let mut fixed: Vec<&QuoteRecord> = params
        .fixed_types
        .iter()
        .flat_map(|kind| snapshot.of_type(kind).collect::<Vec<_>>())
        .collect();

    if linked.is_empty() || fixed.is_empty() {
        log::debug!(
            "no breakeven pairs on {}: {} fixed, {} linked quotes",
            snapshot.quote_date(),
            fixed.len(),
            linked.len()
        );
        return Ok(Vec::new());
    }

    fixed.sort_by_key(|r| r.maturity_date);
    let linked_maturities: Vec<Date> = linked.iter().map(|r| r.maturity_date).collect();

    let mut points = Vec::with_capacity(fixed.len());
    for fixed_record in fixed {
        let nearest = nearest_to(&linked_maturities, fixed_record.maturity_date, params.tie_break)?;
        let gap = nearest.abs_days_between(&fixed_record.maturity_date);
        if gap >= params.max_gap_days {
            log::debug!(
                "{} {}: nearest linked maturity {nearest} is {gap} days away",
                fixed_record.instrument_type,
                fixed_record.maturity_date
            );
            continue;
        }
        let Some(linked_record) = linked.iter().find(|r| r.maturity_date == nearest) else {
            continue;
        };
        points.push(BreakevenPoint {
            quote_date: snapshot.quote_date(),
            fixed_type: fixed_record.instrument_type.clone(),
            fixed_maturity: fixed_record.maturity_date,
            fixed_rate: fixed_record.purchase_rate,
            linked_type: linked_record.instrument_type.clone(),
            linked_maturity: linked_record.maturity_date,
            linked_rate: linked_record.purchase_rate,
            breakeven: breakeven_rate(fixed_record.purchase_rate, linked_record.purchase_rate),
        });
    }

    Ok(points)
}

/// Breakevens on the most recent quote date of the table.
pub fn implied_inflation_latest(
    table: &QuoteTable,
    params: &BreakevenParams,
) -> AnalyticsResult<Vec<BreakevenPoint>> {
    match table.latest_quote_date() {
        Some(latest) => implied_inflation(&table.snapshot(latest), params),
        None => Ok(Vec::new()),
    }
}
