//! Parsers for the three catalog CSV files.
//!
//! All three share [`read_rows`]: a header row is required, a leading BOM is
//! tolerated, header names are matched ignoring case and spaces, and values
//! are trimmed.

pub mod dimensions;
pub mod materials;
pub mod openings;

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use crate::error::{LoadError, Result};

/// One data row, keyed by normalized header name.
#[derive(Debug, Clone)]
pub(crate) struct CsvRow {
    pub line: u64,
    values: BTreeMap<String, String>,
}

impl CsvRow {
    /// Non-empty value of a column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values
            .get(&normalize_header(column))
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Parse an optional column; unknown tokens fail the whole file.
    pub fn parse<T>(&self, path: &Path, column: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(column)
            .map(|raw| {
                raw.parse::<T>().map_err(|e| {
                    LoadError::csv(path, format!("line {}: column {column}: {e}", self.line))
                })
            })
            .transpose()
    }

    /// Lenient numeric column: unparsable values read as absent.
    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(|raw| raw.parse().ok())
    }
}

pub(crate) fn normalize_header(name: &str) -> String {
    name.trim_matches('\u{feff}')
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// Read every data row of `contents`, failing when a required header is absent.
pub(crate) fn read_rows(path: &Path, contents: &[u8], required: &[&str]) -> Result<Vec<CsvRow>> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(::csv::Trim::All)
        .from_reader(contents);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::csv(path, e.to_string()))?
        .iter()
        .map(normalize_header)
        .collect();

    for column in required {
        if !headers.contains(&normalize_header(column)) {
            return Err(LoadError::csv(
                path,
                format!("missing required column: {column}"),
            ));
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| LoadError::csv(path, e.to_string()))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record.position().map(::csv::Position::line).unwrap_or(0);
        let values = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.clone(), value.to_string()))
            .collect();
        rows.push(CsvRow { line, values });
    }
    Ok(rows)
}
