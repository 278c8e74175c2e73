//! Bond dataset normalization.
//!
//! Turns raw Treasury export rows (Portuguese decimal format, `DD/MM/YYYY`
//! dates) into an immutable `QuoteTable`, and offers the grouped views the
//! analytics read from: per-date snapshots and per-type filters.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{Date, InstrumentType, QuoteRecord};

/// One unparsed row of the Treasury price/rate export.
///
/// Optional columns are empty strings when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawQuoteRow {
    /// "Tipo Titulo".
    pub instrument_type: String,
    /// "Data Vencimento".
    pub maturity_date: String,
    /// "Data Base".
    pub quote_date: String,
    /// "Taxa Compra Manha".
    pub purchase_rate: String,
    /// "Taxa Venda Manha".
    #[serde(default)]
    pub sale_rate: String,
    /// "PU Compra Manha".
    pub unit_price: String,
    /// "PU Venda Manha".
    #[serde(default)]
    pub sale_price: String,
    /// "PU Base Manha".
    #[serde(default)]
    pub base_price: String,
}

/// Parses a number written as `1.234,56` (pt-BR), `1,234.56` or `1234.56`.
///
/// When both separators appear, the last one is the decimal mark. A lone
/// comma is the pt-BR decimal mark.
pub fn parse_decimal(field: &str, raw: &str) -> CoreResult<Decimal> {
    let trimmed = raw.trim();
    let normalized = match (trimmed.rfind(','), trimmed.rfind('.')) {
        (Some(comma), Some(dot)) if dot > comma => trimmed.replace(',', ""),
        (Some(_), _) => trimmed.replace('.', "").replace(',', "."),
        (None, _) => trimmed.to_string(),
    };
    Decimal::from_str(&normalized).map_err(|_| CoreError::invalid_number(field, raw))
}

fn parse_rate(field: &str, raw: &str) -> CoreResult<f64> {
    parse_decimal(field, raw)?
        .to_f64()
        .ok_or_else(|| CoreError::invalid_number(field, raw))
}

fn optional<T>(raw: &str, parse: impl FnOnce(&str) -> CoreResult<T>) -> CoreResult<Option<T>> {
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        parse(raw).map(Some)
    }
}

impl RawQuoteRow {
    /// Normalizes this row. `row` is the 1-based source row for errors.
    pub fn normalize(&self, row: usize) -> CoreResult<QuoteRecord> {
        let wrap = |e: CoreError| CoreError::invalid_row(row, e.to_string());

        if self.instrument_type.trim().is_empty() {
            return Err(CoreError::invalid_row(row, "empty instrument type"));
        }

        Ok(QuoteRecord {
            instrument_type: InstrumentType::from_label(&self.instrument_type),
            quote_date: Date::parse_any(&self.quote_date).map_err(wrap)?,
            maturity_date: Date::parse_any(&self.maturity_date).map_err(wrap)?,
            purchase_rate: parse_rate("Taxa Compra Manha", &self.purchase_rate).map_err(wrap)?,
            unit_price: parse_decimal("PU Compra Manha", &self.unit_price).map_err(wrap)?,
            sale_rate: optional(&self.sale_rate, |s| parse_rate("Taxa Venda Manha", s))
                .map_err(wrap)?,
            sale_price: optional(&self.sale_price, |s| parse_decimal("PU Venda Manha", s))
                .map_err(wrap)?,
            base_price: optional(&self.base_price, |s| parse_decimal("PU Base Manha", s))
                .map_err(wrap)?,
        })
    }
}

/// Immutable table of normalized bond quotes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteTable {
    records: Vec<QuoteRecord>,
}

impl QuoteTable {
    /// Normalizes raw rows. Any unparseable row fails the load.
    pub fn from_rows(rows: impl IntoIterator<Item = RawQuoteRow>) -> CoreResult<Self> {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| row.normalize(i + 1))
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(Self::from_records(records))
    }

    /// Builds a table from typed records, keeping the first record for each
    /// `(instrument_type, quote_date, maturity_date)` key.
    pub fn from_records(records: impl IntoIterator<Item = QuoteRecord>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        let mut duplicates = 0usize;

        for record in records {
            let key = (
                record.instrument_type.clone(),
                record.quote_date,
                record.maturity_date,
            );
            if seen.insert(key) {
                kept.push(record);
            } else {
                duplicates += 1;
            }
        }

        if duplicates > 0 {
            log::warn!("dropped {duplicates} duplicate quote rows");
        }
        log::debug!("quote table normalized: {} records", kept.len());

        Self { records: kept }
    }

    /// All records in load order.
    #[must_use]
    pub fn records(&self) -> &[QuoteRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose type is one of `types`, in load order.
    pub fn of_types<'a>(
        &'a self,
        types: &'a [InstrumentType],
    ) -> impl Iterator<Item = &'a QuoteRecord> + 'a {
        self.records
            .iter()
            .filter(move |r| types.contains(&r.instrument_type))
    }

    /// Distinct quote dates carrying any of `types`, ascending.
    #[must_use]
    pub fn quote_dates(&self, types: &[InstrumentType]) -> Vec<Date> {
        self.of_types(types)
            .map(|r| r.quote_date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Most recent quote date overall.
    #[must_use]
    pub fn latest_quote_date(&self) -> Option<Date> {
        self.records.iter().map(|r| r.quote_date).max()
    }

    /// All records quoted on `date`.
    #[must_use]
    pub fn snapshot(&self, date: Date) -> QuoteSnapshot<'_> {
        QuoteSnapshot {
            quote_date: date,
            records: self.records.iter().filter(|r| r.quote_date == date).collect(),
        }
    }

    /// Groups the records of `types` into one snapshot per quote date, in
    /// ascending date order. Records keep load order within a snapshot.
    #[must_use]
    pub fn snapshots(&self, types: &[InstrumentType]) -> Vec<QuoteSnapshot<'_>> {
        let mut grouped: BTreeMap<Date, Vec<&QuoteRecord>> = BTreeMap::new();
        for record in self.records.iter().filter(|r| types.contains(&r.instrument_type)) {
            grouped.entry(record.quote_date).or_default().push(record);
        }
        grouped
            .into_iter()
            .map(|(quote_date, records)| QuoteSnapshot {
                quote_date,
                records,
            })
            .collect()
    }
}

/// All quotes sharing one quote date. Borrowed from a `QuoteTable`.
#[derive(Debug, Clone)]
pub struct QuoteSnapshot<'a> {
    quote_date: Date,
    records: Vec<&'a QuoteRecord>,
}

impl<'a> QuoteSnapshot<'a> {
    /// Builds a snapshot from records that share `quote_date`; records from
    /// other dates are ignored.
    #[must_use]
    pub fn new(quote_date: Date, records: impl IntoIterator<Item = &'a QuoteRecord>) -> Self {
        Self {
            quote_date,
            records: records
                .into_iter()
                .filter(|r| r.quote_date == quote_date)
                .collect(),
        }
    }

    /// The shared quote date.
    #[must_use]
    pub fn quote_date(&self) -> Date {
        self.quote_date
    }

    /// Records in load order.
    #[must_use]
    pub fn records(&self) -> &[&'a QuoteRecord] {
        &self.records
    }

    /// True when the snapshot holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records of one type, in load order.
    pub fn of_type<'s>(
        &'s self,
        instrument_type: &'s InstrumentType,
    ) -> impl Iterator<Item = &'a QuoteRecord> + 's {
        self.records
            .iter()
            .copied()
            .filter(move |r| &r.instrument_type == instrument_type)
    }

    /// Distinct maturities of one type, in first-encountered order.
    #[must_use]
    pub fn maturities(&self, instrument_type: &InstrumentType) -> Vec<Date> {
        let mut seen = HashSet::new();
        self.of_type(instrument_type)
            .map(|r| r.maturity_date)
            .filter(|m| seen.insert(*m))
            .collect()
    }

    /// The record of `instrument_type` maturing on `maturity`.
    #[must_use]
    pub fn find(&self, instrument_type: &InstrumentType, maturity: Date) -> Option<&'a QuoteRecord> {
        self.of_type(instrument_type)
            .find(|r| r.maturity_date == maturity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn raw(kind: &str, maturity: &str, base: &str, rate: &str, pu: &str) -> RawQuoteRow {
        RawQuoteRow {
            instrument_type: kind.into(),
            maturity_date: maturity.into(),
            quote_date: base.into(),
            purchase_rate: rate.into(),
            unit_price: pu.into(),
            ..RawQuoteRow::default()
        }
    }

    #[test]
    fn test_parse_decimal_formats() {
        assert_eq!(parse_decimal("x", "1.234,56").unwrap(), dec!(1234.56));
        assert_eq!(parse_decimal("x", "6,12").unwrap(), dec!(6.12));
        assert_eq!(parse_decimal("x", "1234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_decimal("x", " -0,5 ").unwrap(), dec!(-0.5));
        assert_eq!(parse_decimal("x", "1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_decimal("x", "12,345,678.9").unwrap(), dec!(12345678.9));
        assert!(parse_decimal("x", "1.234,5.6").is_err());
        assert!(parse_decimal("x", "abc").is_err());
        assert!(parse_decimal("x", "").is_err());
    }

    #[test]
    fn test_normalize_row() {
        let mut row = raw(
            "Tesouro IPCA+ com Juros Semestrais",
            "15/05/2035",
            "02/01/2025",
            "7,21",
            "4.123,45",
        );
        row.sale_rate = "7,33".into();

        let record = row.normalize(1).unwrap();
        assert_eq!(record.instrument_type, InstrumentType::IpcaJurosSemestrais);
        assert_eq!(record.maturity_date, Date::from_ymd(2035, 5, 15).unwrap());
        assert_eq!(record.quote_date, Date::from_ymd(2025, 1, 2).unwrap());
        assert!((record.purchase_rate - 7.21).abs() < 1e-12);
        assert_eq!(record.unit_price, dec!(4123.45));
        assert_eq!(record.sale_rate, Some(7.33));
        assert_eq!(record.sale_price, None);
    }

    #[test]
    fn test_bad_row_reports_row_number() {
        let rows = vec![
            raw("Tesouro Prefixado", "01/01/2031", "02/01/2025", "15,1", "400,0"),
            raw("Tesouro Prefixado", "31/02/2031", "02/01/2025", "15,1", "400,0"),
        ];
        let err = QuoteTable::from_rows(rows).unwrap_err();
        assert!(matches!(err, CoreError::InvalidRow { row: 2, .. }));
    }

    #[test]
    fn test_empty_input_is_valid() {
        let table = QuoteTable::from_rows(Vec::new()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.latest_quote_date(), None);
        assert!(table.snapshots(&[InstrumentType::Prefixado]).is_empty());
    }

    #[test]
    fn test_duplicate_keys_keep_first() {
        let rows = vec![
            raw("Tesouro Prefixado", "01/01/2031", "02/01/2025", "15,1", "400,0"),
            raw("Tesouro Prefixado", "01/01/2031", "02/01/2025", "99,9", "1,0"),
            raw("Tesouro IPCA+", "01/01/2031", "02/01/2025", "7,0", "3000,0"),
        ];
        let table = QuoteTable::from_rows(rows).unwrap();
        assert_eq!(table.len(), 2);
        assert!((table.records()[0].purchase_rate - 15.1).abs() < 1e-12);
    }

    #[test]
    fn test_snapshots_group_by_date() {
        let rows = vec![
            raw("Tesouro Prefixado", "01/01/2031", "03/01/2025", "15,0", "400,0"),
            raw("Tesouro Prefixado", "01/01/2029", "02/01/2025", "14,0", "600,0"),
            raw("Tesouro Prefixado", "01/01/2031", "02/01/2025", "15,1", "401,0"),
            raw("Tesouro Selic", "01/03/2030", "02/01/2025", "0,1", "15000,0"),
        ];
        let table = QuoteTable::from_rows(rows).unwrap();
        let snapshots = table.snapshots(&[InstrumentType::Prefixado]);
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].quote_date(), Date::from_ymd(2025, 1, 2).unwrap());
        assert_eq!(
            snapshots[0].maturities(&InstrumentType::Prefixado),
            vec![
                Date::from_ymd(2029, 1, 1).unwrap(),
                Date::from_ymd(2031, 1, 1).unwrap()
            ]
        );
        assert_eq!(
            table.quote_dates(&[InstrumentType::Selic]),
            vec![Date::from_ymd(2025, 1, 2).unwrap()]
        );
    }

    #[test]
    fn test_snapshots_outlive_type_filter() {
        let rows = vec![
            raw("Tesouro Prefixado", "01/01/2031", "02/01/2025", "15,1", "401,0"),
            raw("Tesouro IPCA+", "15/05/2035", "02/01/2025", "7,0", "3000,0"),
        ];
        let table = QuoteTable::from_rows(rows).unwrap();
        let snapshots = {
            let types = vec![InstrumentType::Ipca];
            table.snapshots(&types)
        };
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].records().len(), 1);
    }
}
