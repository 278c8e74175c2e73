//! Treasury price/rate export (`;`-separated, decimal comma).

use std::path::Path;

use serde::Deserialize;

use curvewatch_core::dataset::{QuoteTable, RawQuoteRow};

use crate::error::{FileError, FileResult};
use crate::reader;

/// One row as laid out in the export.
#[derive(Debug, Deserialize)]
struct TreasuryCsvRow {
    #[serde(rename = "Tipo Titulo")]
    instrument_type: String,
    #[serde(rename = "Data Vencimento")]
    maturity_date: String,
    #[serde(rename = "Data Base")]
    quote_date: String,
    #[serde(rename = "Taxa Compra Manha")]
    purchase_rate: String,
    #[serde(rename = "Taxa Venda Manha", default)]
    sale_rate: String,
    #[serde(rename = "PU Compra Manha")]
    unit_price: String,
    #[serde(rename = "PU Venda Manha", default)]
    sale_price: String,
    #[serde(rename = "PU Base Manha", default)]
    base_price: String,
}

impl From<TreasuryCsvRow> for RawQuoteRow {
    fn from(row: TreasuryCsvRow) -> Self {
        RawQuoteRow {
            instrument_type: row.instrument_type,
            maturity_date: row.maturity_date,
            quote_date: row.quote_date,
            purchase_rate: row.purchase_rate,
            sale_rate: row.sale_rate,
            unit_price: row.unit_price,
            sale_price: row.sale_price,
            base_price: row.base_price,
        }
    }
}

/// Reads the raw rows of a Treasury export without normalizing them.
pub fn read_treasury_rows(path: impl AsRef<Path>) -> FileResult<Vec<RawQuoteRow>> {
    let path = path.as_ref();
    let mut csv = reader::open(path, b';')?;
    let display = path.display().to_string();

    csv.deserialize::<TreasuryCsvRow>()
        .enumerate()
        .map(|(i, row)| {
            row.map(RawQuoteRow::from)
                .map_err(|e| FileError::invalid_row(&display, i + 1, e))
        })
        .collect()
}

/// Reads and normalizes a Treasury export into a quote table.
pub fn load_treasury_quotes(path: impl AsRef<Path>) -> FileResult<QuoteTable> {
    let path = path.as_ref();
    let rows = read_treasury_rows(path)?;
    let table = QuoteTable::from_rows(rows).map_err(|e| match e {
        curvewatch_core::CoreError::InvalidRow { row, reason } => {
            FileError::invalid_row(&path.display().to_string(), row, reason)
        }
        other => FileError::invalid_row(&path.display().to_string(), 0, other),
    })?;
    log::info!("{}: {} treasury quotes", path.display(), table.len());
    Ok(table)
}
