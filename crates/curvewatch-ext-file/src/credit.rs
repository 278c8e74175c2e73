//! Credit index constituent files.
//!
//! One row per (date, issuer) with the issuer's index weight and spread.
//! The spread column differs between index families, so it is named by the
//! caller.

use std::path::Path;

use rust_decimal::prelude::ToPrimitive;

use curvewatch_core::dataset::parse_decimal;
use curvewatch_core::{CreditConstituent, Date};

use crate::error::{FileError, FileResult};
use crate::reader::{self, Columns};

/// Date column.
pub const DATE_COLUMN: &str = "Data";
/// Issuer column.
pub const ISSUER_COLUMN: &str = "Emissor";
/// Index weight column, in percent.
pub const WEIGHT_COLUMN: &str = "Peso no índice (%)";

fn number(columns: &Columns, row: usize, field: &str, raw: &str) -> FileResult<f64> {
    parse_decimal(field, raw)
        .ok()
        .and_then(|d| d.to_f64())
        .ok_or_else(|| FileError::invalid_row(columns.path(), row, format!("bad {field} '{raw}'")))
}

/// Reads constituents, taking the spread from `spread_column`.
///
/// Rows with an empty spread or weight are skipped.
pub fn load_credit_constituents(
    path: impl AsRef<Path>,
    spread_column: &str,
) -> FileResult<Vec<CreditConstituent>> {
    let path = path.as_ref();
    let mut csv = reader::open(path, reader::sniff_delimiter(path)?)?;
    let columns = Columns::new(path, csv.headers()?);
    let date_idx = columns.find(DATE_COLUMN)?;
    let issuer_idx = columns.find(ISSUER_COLUMN)?;
    let weight_idx = columns.find(WEIGHT_COLUMN)?;
    let spread_idx = columns.find(spread_column)?;

    let mut constituents = Vec::new();
    let mut skipped = 0usize;
    for (i, record) in csv.records().enumerate() {
        let row = i + 1;
        let record = record?;
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let (weight_raw, spread_raw) = (field(weight_idx), field(spread_idx));
        if weight_raw.is_empty() || spread_raw.is_empty() {
            skipped += 1;
            continue;
        }

        let quote_date = Date::parse_any(field(date_idx))
            .map_err(|e| FileError::invalid_row(columns.path(), row, e))?;
        constituents.push(CreditConstituent::new(
            quote_date,
            field(issuer_idx),
            number(&columns, row, WEIGHT_COLUMN, weight_raw)?,
            number(&columns, row, spread_column, spread_raw)?,
        ));
    }

    if skipped > 0 {
        log::debug!("{}: skipped {skipped} rows without weight or spread", path.display());
    }
    log::info!("{}: {} constituents", path.display(), constituents.len());
    Ok(constituents)
}
