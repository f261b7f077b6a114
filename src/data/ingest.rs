//! CSV ingest and normalization.
//!
//! Turns pasted or uploaded CSV text into the canonical dashboard shape.
//! Only donations come from the file:
//!
//! - a header row is required; `year` and `donations` are the recognized columns
//! - any malformed row (e.g. wrong field count) fails the whole parse
//! - rows lacking a usable `year` or `donations` value are dropped, not fatal
//! - output is sorted ascending by year, one record per year

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use csv::StringRecord;
use tracing::warn;

use crate::data::sample::{csv_placeholder, placeholder_donations};
use crate::domain::{DashboardData, DonationRecord};
use crate::error::IngestError;

const EMPTY_INPUT_MESSAGE: &str = "Please paste CSV data or upload a file.";

/// What happened to the rows of one CSV import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvReport {
    pub rows_read: usize,
    pub rows_used: usize,
    /// Rows missing a value or holding one that does not parse.
    pub rows_skipped: usize,
    /// Rows whose year was already seen; the later row wins.
    pub duplicate_years: usize,
    /// Set when no usable rows remained and placeholder years were substituted.
    pub placeholder: bool,
}

/// Parsed CSV: canonical data plus the row report.
#[derive(Debug, Clone)]
pub struct CsvImport {
    pub data: DashboardData,
    pub report: CsvReport,
}

/// Parse CSV text with `year` and `donations` columns into canonical data.
pub fn parse_donations_csv(text: &str) -> Result<CsvImport, IngestError> {
    if text.trim().is_empty() {
        return Err(IngestError::Validation(EMPTY_INPUT_MESSAGE.to_string()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| IngestError::Parse(format!("CSV parsing error: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
    let mut report = CsvReport::default();

    for result in reader.records() {
        let record = result.map_err(|e| IngestError::Parse(format!("CSV parsing error: {e}")))?;
        report.rows_read += 1;

        let Some(row) = parse_row(&record, &header_map) else {
            report.rows_skipped += 1;
            continue;
        };
        if by_year.insert(row.year, row.amount).is_some() {
            report.duplicate_years += 1;
        }
    }

    let mut data = csv_placeholder();
    data.donations_by_year = by_year
        .into_iter()
        .map(|(year, amount)| DonationRecord { year, amount })
        .collect();
    report.rows_used = data.donations_by_year.len();

    if data.donations_by_year.is_empty() {
        data.donations_by_year = placeholder_donations();
        report.placeholder = true;
    }

    Ok(CsvImport { data, report })
}

/// Read an uploaded CSV file into text.
///
/// Non-UTF-8 exports (e.g. Latin-1 spreadsheets) are decoded lossily rather
/// than rejected; the numeric columns survive either way.
pub fn read_csv_file(path: &Path) -> Result<String, IngestError> {
    let bytes = std::fs::read(path)
        .map_err(|e| IngestError::Validation(format!("Failed to read CSV '{}': {e}", path.display())))?;

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            warn!(path = %path.display(), "CSV file is not UTF-8; decoding lossily");
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Option<DonationRecord> {
    let year = get_value(record, header_map, "year")?.parse::<i32>().ok()?;
    let amount = get_value(record, header_map, "donations")?.parse::<f64>().ok()?;
    if !amount.is_finite() || amount < 0.0 {
        return None;
    }
    Some(DonationRecord { year, amount })
}

fn get_value<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}
