//! Two-column date/value files, such as central bank or FRED exports.

use std::path::Path;

use curvewatch_core::dataset::parse_decimal;
use curvewatch_core::{Date, Series};
use rust_decimal::prelude::ToPrimitive;

use crate::error::{FileError, FileResult};
use crate::reader::{self, Columns};

/// Reads a date/value file. The series takes `name`, or the value column's
/// header when `name` is `None`.
///
/// Unparseable values (FRED writes `.` for holidays) are skipped.
pub fn load_series(path: impl AsRef<Path>, name: Option<&str>) -> FileResult<Series> {
    let path = path.as_ref();
    let mut csv = reader::open(path, reader::sniff_delimiter(path)?)?;
    let columns = Columns::new(path, csv.headers()?);
    let Some(value_header) = columns.names().get(1) else {
        return Err(FileError::MissingColumn {
            path: columns.path().to_string(),
            column: "<value>".to_string(),
        });
    };

    let mut series = Series::new(name.unwrap_or(value_header));
    let mut skipped = 0usize;
    for (i, record) in csv.records().enumerate() {
        let record = record?;
        let date = Date::parse_any(record.get(0).unwrap_or(""))
            .map_err(|e| FileError::invalid_row(columns.path(), i + 1, e))?;
        let raw = record.get(1).unwrap_or("");
        match parse_decimal(value_header, raw).ok().and_then(|d| d.to_f64()) {
            Some(value) => series.insert(date, value),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        log::debug!("{}: skipped {skipped} rows without a value", path.display());
    }
    Ok(series)
}
