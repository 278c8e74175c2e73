//! Shared CSV plumbing.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord, Trim};

use crate::error::{FileError, FileResult};

fn io_error(path: &Path, e: impl ToString) -> FileError {
    FileError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

/// `;` when the header line contains one, `,` otherwise.
pub(crate) fn sniff_delimiter(path: &Path) -> FileResult<u8> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    let mut header = String::new();
    BufReader::new(file)
        .read_line(&mut header)
        .map_err(|e| io_error(path, e))?;
    Ok(if header.contains(';') { b';' } else { b',' })
}

pub(crate) fn open(path: &Path, delimiter: u8) -> FileResult<Reader<File>> {
    ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(Trim::All)
        .from_path(path)
        .map_err(|e| io_error(path, e))
}

/// Header lookup by name, ignoring a leading byte-order mark.
pub(crate) struct Columns {
    path: String,
    names: Vec<String>,
}

impl Columns {
    pub(crate) fn new(path: &Path, header: &StringRecord) -> Self {
        Self {
            path: path.display().to_string(),
            names: header
                .iter()
                .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
                .collect(),
        }
    }

    pub(crate) fn names(&self) -> &[String] {
        &self.names
    }

    pub(crate) fn find(&self, column: &str) -> FileResult<usize> {
        self.names
            .iter()
            .position(|n| n.eq_ignore_ascii_case(column))
            .ok_or_else(|| FileError::MissingColumn {
                path: self.path.clone(),
                column: column.to_string(),
            })
    }

    pub(crate) fn path(&self) -> &str {
        &self.path
    }
}
