//! Per-maturity rate and price histories.

use std::collections::{BTreeMap, BTreeSet};

use curvewatch_core::dataset::QuoteTable;
use curvewatch_core::{Date, InstrumentType, QuoteRecord, Series};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Maturity years preselected for history views.
pub const DEFAULT_MATURITY_YEARS: [i32; 5] = [2030, 2035, 2040, 2045, 2060];

/// Which quote field to chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryMetric {
    /// Purchase rate, % p.a.
    #[default]
    PurchaseRate,
    /// Purchase unit price.
    UnitPrice,
}

impl HistoryMetric {
    fn value(self, record: &QuoteRecord) -> Option<f64> {
        match self {
            HistoryMetric::PurchaseRate => Some(record.purchase_rate),
            HistoryMetric::UnitPrice => record.unit_price.to_f64(),
        }
    }
}

/// History of one bond.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaturityHistory {
    /// Bond type.
    pub instrument_type: InstrumentType,
    /// Bond maturity.
    pub maturity_date: Date,
    /// Field charted.
    pub metric: HistoryMetric,
    /// Values by quote date, named e.g. `"IPCA+ 2035"`.
    pub series: Series,
}

/// Distinct maturities of `types`, ascending.
#[must_use]
pub fn available_maturities(table: &QuoteTable, types: &[InstrumentType]) -> Vec<Date> {
    table
        .of_types(types)
        .map(|r| r.maturity_date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Available maturities of `types` falling in one of `years`.
#[must_use]
pub fn maturities_in_years(table: &QuoteTable, types: &[InstrumentType], years: &[i32]) -> Vec<Date> {
    available_maturities(table, types)
        .into_iter()
        .filter(|m| years.contains(&m.year()))
        .collect()
}

/// One history per `(type, maturity)` pair present in the table, ordered by
/// maturity then type. Maturities with no quotes produce nothing.
#[must_use]
pub fn maturity_history(
    table: &QuoteTable,
    types: &[InstrumentType],
    maturities: &[Date],
    metric: HistoryMetric,
) -> Vec<MaturityHistory> {
    let mut grouped: BTreeMap<(Date, InstrumentType), Series> = BTreeMap::new();
    for record in table
        .of_types(types)
        .filter(|r| maturities.contains(&r.maturity_date))
    {
        let Some(value) = metric.value(record) else {
            continue;
        };
        grouped
            .entry((record.maturity_date, record.instrument_type.clone()))
            .or_insert_with(|| {
                Series::new(format!(
                    "{} {}",
                    record.instrument_type.short_name(),
                    record.maturity_date.year()
                ))
            })
            .insert(record.quote_date, value);
    }

    grouped
        .into_iter()
        .map(|((maturity_date, instrument_type), series)| MaturityHistory {
            instrument_type,
            maturity_date,
            metric,
            series,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn table() -> QuoteTable {
        QuoteTable::from_records(vec![
            QuoteRecord::new(InstrumentType::IpcaJurosSemestrais, d(2025, 1, 3), d(2035, 5, 15), 7.1, dec!(4100.5)),
            QuoteRecord::new(InstrumentType::IpcaJurosSemestrais, d(2025, 1, 2), d(2035, 5, 15), 7.0, dec!(4120.0)),
            QuoteRecord::new(InstrumentType::Ipca, d(2025, 1, 2), d(2035, 5, 15), 6.9, dec!(1800.0)),
            QuoteRecord::new(InstrumentType::Ipca, d(2025, 1, 2), d(2029, 5, 15), 7.3, dec!(2900.0)),
            QuoteRecord::new(InstrumentType::Prefixado, d(2025, 1, 2), d(2030, 1, 1), 13.0, dec!(600.0)),
        ])
    }

    #[test]
    fn test_default_maturities() {
        let types = [InstrumentType::Ipca, InstrumentType::IpcaJurosSemestrais];
        let picked = maturities_in_years(&table(), &types, &DEFAULT_MATURITY_YEARS);
        assert_eq!(picked, vec![d(2035, 5, 15)]);
        assert_eq!(available_maturities(&table(), &types).len(), 2);
    }

    #[test]
    fn test_history_per_type_and_maturity() {
        let types = [InstrumentType::Ipca, InstrumentType::IpcaJurosSemestrais];
        let histories = maturity_history(&table(), &types, &[d(2035, 5, 15)], HistoryMetric::PurchaseRate);
        assert_eq!(histories.len(), 2);

        let coupon = histories
            .iter()
            .find(|h| h.instrument_type == InstrumentType::IpcaJurosSemestrais)
            .unwrap();
        assert_eq!(coupon.series.values(), vec![7.0, 7.1]);
        assert_eq!(coupon.series.name(), "IPCA+ com Juros Semestrais 2035");
    }

    #[test]
    fn test_unit_price_metric() {
        let types = [InstrumentType::IpcaJurosSemestrais];
        let histories = maturity_history(&table(), &types, &[d(2035, 5, 15)], HistoryMetric::UnitPrice);
        assert_eq!(histories[0].series.values(), vec![4120.0, 4100.5]);
    }

    #[test]
    fn test_no_selection_no_history() {
        let types = [InstrumentType::Ipca];
        assert!(maturity_history(&table(), &types, &[], HistoryMetric::PurchaseRate).is_empty());
    }
}
