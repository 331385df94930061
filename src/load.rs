//! CSV file loading.
//!
//! Turns one CSV file into a [`Table`]: the first date-like column becomes
//! the timestamp key, a literal `Breakdown` header becomes the sub-series
//! column, and every other column is numeric with unparsable cells mapped to
//! the missing marker. A file with no recognizable timestamp column is a hard
//! failure; a bad cell never is.

use crate::error::{Result, SeamError};
use crate::pattern::parse_stamp;
use crate::table::{Row, Table};
use csv::StringRecord;
use std::fs::File;
use std::path::Path;

/// Exact header name the exports use for sub-series splits.
pub const BREAKDOWN_COLUMN: &str = "Breakdown";

/// Share of non-empty cells that must parse as timestamps for a column to be
/// accepted as the timestamp key by content inspection.
const TIMESTAMP_CONTENT_RATIO: f64 = 0.8;

/// Loads a CSV file into a timestamp-sorted [`Table`].
///
/// # Errors
/// `SeamError::EmptyFile` when the file has no header row,
/// `SeamError::MalformedFile` when no timestamp column can be identified,
/// `SeamError::Csv`/`SeamError::Io` on reader failures.
pub fn load_table(path: &Path) -> Result<Table> {
    let file = File::open(path).map_err(|source| SeamError::Io {
        source,
        path: path.to_path_buf(),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| SeamError::Csv {
            source,
            path: path.to_path_buf(),
        })?
        .iter()
        .map(normalize_header)
        .collect();

    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(SeamError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    // Small files, and content-based timestamp detection needs a full pass
    // anyway: read everything up front.
    let mut records: Vec<StringRecord> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| SeamError::Csv {
            source,
            path: path.to_path_buf(),
        })?;
        records.push(record);
    }

    let ts_idx = find_timestamp_column(&headers, &records).ok_or(SeamError::MalformedFile {
        path: path.to_path_buf(),
    })?;
    let breakdown_idx = headers.iter().position(|h| h == BREAKDOWN_COLUMN);

    let mut table = Table::new(headers[ts_idx].clone());
    table.breakdown_column = breakdown_idx.map(|i| headers[i].clone());
    let value_indices: Vec<usize> = (0..headers.len())
        .filter(|&i| i != ts_idx && Some(i) != breakdown_idx)
        .collect();
    table.columns = value_indices.iter().map(|&i| headers[i].clone()).collect();

    for record in &records {
        // Rows whose timestamp cell does not parse are dropped, not fatal.
        let Some(timestamp) = record.get(ts_idx).and_then(parse_stamp) else {
            continue;
        };
        let breakdown = breakdown_idx
            .and_then(|i| record.get(i))
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let values = value_indices
            .iter()
            .map(|&i| parse_cell(record.get(i)))
            .collect();
        table.rows.push(Row {
            timestamp,
            breakdown,
            values,
        });
    }

    table.sort_rows();
    Ok(table)
}

fn normalize_header(name: &str) -> String {
    // Excel-style exports sometimes prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

/// Numeric cells parse to `Some`; empty or non-numeric cells are the
/// explicit missing marker, never an error and never zero.
fn parse_cell(cell: Option<&str>) -> Option<f64> {
    let v = cell?.parse::<f64>().ok()?;
    v.is_finite().then_some(v)
}

/// Picks the timestamp column: first by header name (`date`/`time`,
/// case-insensitive), then by content (first column where at least 80% of
/// non-empty cells parse as timestamps).
fn find_timestamp_column(headers: &[String], records: &[StringRecord]) -> Option<usize> {
    if let Some(idx) = headers
        .iter()
        .position(|h| {
            let h = h.to_lowercase();
            h.contains("date") || h.contains("time")
        })
    {
        return Some(idx);
    }

    for idx in 0..headers.len() {
        let mut non_empty = 0usize;
        let mut parsed = 0usize;
        for record in records {
            let Some(cell) = record.get(idx).filter(|s| !s.is_empty()) else {
                continue;
            };
            non_empty += 1;
            if parse_stamp(cell).is_some() {
                parsed += 1;
            }
        }
        #[allow(clippy::cast_precision_loss)]
        if non_empty > 0 && parsed as f64 >= TIMESTAMP_CONTENT_RATIO * non_empty as f64 {
            return Some(idx);
        }
    }
    None
}
