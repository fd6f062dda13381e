//! CSV ingest and validation.
//!
//! This module turns a `(quantity, price)` CSV into validated observations
//! that are safe to fit.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Separation of concerns**: no fitting logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{info, warn};

use crate::domain::{DatasetStats, Observation};
use crate::error::AppError;

/// Accepted header names for the quantity column.
const QUANTITY_HEADERS: [&str; 5] = ["quantity", "qty", "q", "quantite", "quantité"];
/// Accepted header names for the price column.
const PRICE_HEADERS: [&str; 3] = ["price", "p", "prix"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: validated observations + stats + row errors.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub observations: Vec<Observation>,
    pub stats: DatasetStats,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load observations from a CSV file.
pub fn load_observations(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let data = read_observations(file)?;
    info!(
        path = %path.display(),
        rows_read = data.rows_read,
        rows_used = data.rows_used,
        "loaded observations"
    );
    Ok(data)
}

/// Read observations from any CSV source with a header row.
pub fn read_observations<R: Read>(source: R) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    let q_idx = find_column(&header_map, &QUANTITY_HEADERS)
        .ok_or_else(|| AppError::new(2, "Missing required column: `quantity`"))?;
    let p_idx = find_column(&header_map, &PRICE_HEADERS)
        .ok_or_else(|| AppError::new(2, "Missing required column: `price`"))?;

    let mut observations = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, q_idx, p_idx) {
            Ok(o) => observations.push(o),
            Err(message) => {
                warn!(line, %message, "skipping CSV row");
                row_errors.push(RowError { line, message });
            }
        }
    }

    let rows_used = observations.len();
    let stats = DatasetStats::from_observations(&observations)
        .ok_or_else(|| AppError::new(3, "No valid rows remain after validation."))?;

    Ok(IngestedData {
        observations,
        stats,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn parse_row(record: &StringRecord, q_idx: usize, p_idx: usize) -> Result<Observation, String> {
    let quantity = get_required(record, q_idx, "quantity")?;
    let price = get_required(record, p_idx, "price")?;
    Observation::parse(quantity, price).map_err(|e| e.to_string())
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, schema validation will incorrectly
    // report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_lowercase()
}

fn find_column(header_map: &HashMap<String, usize>, aliases: &[&str]) -> Option<usize> {
    aliases.iter().find_map(|name| header_map.get(*name).copied())
}

fn get_required<'a>(record: &'a StringRecord, idx: usize, name: &str) -> Result<&'a str, String> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_valid_rows_and_reports_bad_ones() {
        let csv = "\u{feff}Quantity,Price\n1,10\n2,8\n0,5\n4,abc\n4,6.4\n8\n";
        let data = read_observations(csv.as_bytes()).unwrap();

        assert_eq!(data.rows_read, 6);
        assert_eq!(data.rows_used, 3);
        assert_eq!(
            data.observations,
            vec![
                Observation::new(1.0, 10.0).unwrap(),
                Observation::new(2.0, 8.0).unwrap(),
                Observation::new(4.0, 6.4).unwrap(),
            ]
        );
        let lines: Vec<usize> = data.row_errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![4, 5, 7]);
        assert!(data.row_errors[0].message.contains("invalid quantity"));
        assert!(data.row_errors[2].message.contains("Missing required value"));
        assert_eq!(data.stats.quantity_max, 4.0);
    }

    #[test]
    fn accepts_header_aliases() {
        let data = read_observations("prix,quantite\n10,1\n8,2\n".as_bytes()).unwrap();
        assert_eq!(data.observations[1], Observation::new(2.0, 8.0).unwrap());
    }

    #[test]
    fn missing_column_is_a_schema_error() {
        let err = read_observations("quantity,cost\n1,2\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("`price`"));
    }

    #[test]
    fn no_valid_rows_is_a_data_error() {
        let err = read_observations("quantity,price\n-1,2\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "quantity,price\n1,10\n2,8").unwrap();
        let data = load_observations(file.path()).unwrap();
        assert_eq!(data.rows_used, 2);

        let missing = load_observations(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert_eq!(missing.exit_code(), 2);
    }
}
