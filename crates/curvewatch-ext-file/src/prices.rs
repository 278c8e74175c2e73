//! Wide price-history files: a date column followed by one column per
//! ticker.

use std::path::{Path, PathBuf};

use curvewatch_core::dataset::parse_decimal;
use curvewatch_core::traits::PriceHistorySource;
use curvewatch_core::types::PriceTable;
use curvewatch_core::{CoreResult, Date};
use rust_decimal::prelude::ToPrimitive;

use crate::error::{FileError, FileResult};
use crate::reader::{self, Columns};

/// Reads a wide price file. Empty or non-numeric cells are missing prices.
pub fn load_price_table(path: impl AsRef<Path>) -> FileResult<PriceTable> {
    let path = path.as_ref();
    let mut csv = reader::open(path, reader::sniff_delimiter(path)?)?;
    let columns = Columns::new(path, csv.headers()?);
    let tickers: Vec<String> = columns.names().iter().skip(1).cloned().collect();
    if tickers.is_empty() {
        return Err(FileError::MissingColumn {
            path: columns.path().to_string(),
            column: "<ticker>".to_string(),
        });
    }

    let mut observations = Vec::new();
    let mut unreadable = 0usize;
    for (i, record) in csv.records().enumerate() {
        let record = record?;
        let date = Date::parse_any(record.get(0).unwrap_or(""))
            .map_err(|e| FileError::invalid_row(columns.path(), i + 1, e))?;
        for (ticker, cell) in tickers.iter().zip(record.iter().skip(1)) {
            if cell.is_empty() {
                continue;
            }
            match parse_decimal(ticker, cell).ok().and_then(|d| d.to_f64()) {
                Some(price) => observations.push((ticker.clone(), date, price)),
                None => unreadable += 1,
            }
        }
    }

    if unreadable > 0 {
        log::warn!("{}: {unreadable} unreadable price cells treated as missing", path.display());
    }
    Ok(PriceTable::from_observations(observations))
}

/// Price-history source backed by a wide CSV file, read once on creation.
#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    file_path: PathBuf,
    table: PriceTable,
}

impl CsvPriceSource {
    /// Loads the file.
    pub fn new(file_path: impl AsRef<Path>) -> FileResult<Self> {
        let file_path = file_path.as_ref().to_path_buf();
        let table = load_price_table(&file_path)?;
        log::info!(
            "{}: {} tickers over {} dates",
            file_path.display(),
            table.width(),
            table.dates().len()
        );
        Ok(Self { file_path, table })
    }

    /// Re-reads the file.
    pub fn reload(&mut self) -> FileResult<()> {
        self.table = load_price_table(&self.file_path)?;
        Ok(())
    }

    /// Every ticker in the file.
    pub fn tickers(&self) -> &[String] {
        self.table.tickers()
    }

    /// The whole table.
    pub fn table(&self) -> &PriceTable {
        &self.table
    }
}

impl PriceHistorySource for CsvPriceSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn price_history(&self, tickers: &[String], start: Date, end: Date) -> CoreResult<PriceTable> {
        Ok(self.table.select(tickers).between(start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn d(day: u32) -> Date {
        Date::from_ymd(2024, 1, day).unwrap()
    }

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_wide_file() {
        let file = write_csv(
            "Date,PETR4.SA,VALE3.SA\n\
             2024-01-02,38.1,\n\
             2024-01-03,38.5,70.2\n\
             2024-01-04,n/a,71.0\n",
        );
        let table = load_price_table(file.path()).unwrap();
        assert_eq!(table.tickers(), &["PETR4.SA".to_string(), "VALE3.SA".to_string()]);
        assert_eq!(table.dates(), &[d(2), d(3), d(4)]);
        assert_eq!(table.column("PETR4.SA").unwrap(), &[Some(38.1), Some(38.5), None]);
        assert_eq!(table.column("VALE3.SA").unwrap(), &[None, Some(70.2), Some(71.0)]);
    }

    #[test]
    fn test_grouped_thousands() {
        let file = write_csv(
            "Date;IBOV;USD\n\
             2024-01-02;\"134,185.24\";4,91\n\
             2024-01-03;134.185,24;4.1.2\n",
        );
        let table = load_price_table(file.path()).unwrap();
        let ibov = table.column("IBOV").unwrap();
        approx::assert_relative_eq!(ibov[0].unwrap(), 134_185.24, epsilon = 1e-9);
        approx::assert_relative_eq!(ibov[1].unwrap(), 134_185.24, epsilon = 1e-9);
        let usd = table.column("USD").unwrap();
        approx::assert_relative_eq!(usd[0].unwrap(), 4.91, epsilon = 1e-12);
        assert_eq!(usd[1], None);
    }

    #[test]
    fn test_source_filters_tickers_and_dates() {
        let file = write_csv("Date,A,B\n2024-01-02,1,2\n2024-01-03,1.5,2.5\n");
        let source = CsvPriceSource::new(file.path()).unwrap();
        let table = source
            .price_history(&["B".to_string(), "MISSING".to_string()], d(3), d(31))
            .unwrap();
        assert_eq!(table.tickers(), &["B".to_string()]);
        assert_eq!(table.dates(), &[d(3)]);
    }

    #[test]
    fn test_reload_picks_up_changes() {
        let mut file = write_csv("Date,A\n2024-01-02,1\n");
        let mut source = CsvPriceSource::new(file.path()).unwrap();
        writeln!(file, "2024-01-03,2").unwrap();
        source.reload().unwrap();
        assert_eq!(source.table().dates().len(), 2);
        assert_eq!(source.tickers(), &["A".to_string()]);
    }

    #[test]
    fn test_header_only_date() {
        let file = write_csv("Date\n2024-01-02\n");
        assert!(matches!(load_price_table(file.path()), Err(FileError::MissingColumn { .. })));
    }
}
