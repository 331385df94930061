//! Tabular output.
//!
//! The merged dataset leaves the engine as plain CSV or JSON: ordered rows,
//! named columns, empty/`null` for the missing marker. Charting frontends
//! consume these without reaching into aggregation internals.

use crate::error::{Result, SeamError};
use crate::merge::Dataset;
use serde_json::{json, Value};
use std::io::Write;
use std::path::Path;

/// Header used for the attached source-file column.
pub const SOURCE_COLUMN: &str = "Source";

const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// Writes `dataset` as CSV: timestamp column, breakdown column (when
/// present), series columns, then the source column (when attached).
/// Missing cells are empty fields.
///
/// # Errors
/// Propagates CSV writer failures.
pub fn write_csv<W: Write>(dataset: &Dataset, out: W) -> Result<()> {
    let table = &dataset.table;
    let mut writer = csv::Writer::from_writer(out);

    let mut header = vec![table.timestamp_column.clone()];
    if let Some(b) = &table.breakdown_column {
        header.push(b.clone());
    }
    header.extend(table.columns.iter().cloned());
    if dataset.sources.is_some() {
        header.push(SOURCE_COLUMN.to_string());
    }
    writer.write_record(&header).map_err(csv_err)?;

    for (idx, row) in table.rows.iter().enumerate() {
        let mut record = vec![row.timestamp.format(TIMESTAMP_FMT).to_string()];
        if table.breakdown_column.is_some() {
            record.push(row.breakdown.clone().unwrap_or_default());
        }
        record.extend(
            row.values
                .iter()
                .map(|v| v.map_or_else(String::new, |v| v.to_string())),
        );
        if let Some(sources) = &dataset.sources {
            record.push(sources.get(idx).cloned().unwrap_or_default());
        }
        writer.write_record(&record).map_err(csv_err)?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes `dataset` to a CSV file at `path`.
///
/// # Errors
/// Propagates I/O and CSV writer failures.
pub fn write_csv_file(dataset: &Dataset, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|source| SeamError::Io {
        source,
        path: path.to_path_buf(),
    })?;
    write_csv(dataset, file)
}

/// Renders `dataset` as a JSON array of row objects; missing cells are
/// `null`.
#[must_use]
pub fn to_json(dataset: &Dataset) -> Value {
    let table = &dataset.table;
    let rows: Vec<Value> = table
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let mut obj = serde_json::Map::new();
            obj.insert(
                table.timestamp_column.clone(),
                json!(row.timestamp.format(TIMESTAMP_FMT).to_string()),
            );
            if let Some(b) = &table.breakdown_column {
                obj.insert(b.clone(), json!(row.breakdown));
            }
            for (col, value) in table.columns.iter().zip(&row.values) {
                obj.insert(col.clone(), json!(value));
            }
            if let Some(sources) = &dataset.sources {
                obj.insert(SOURCE_COLUMN.to_string(), json!(sources.get(idx)));
            }
            Value::Object(obj)
        })
        .collect();

    json!({
        "group": dataset.group,
        "rows": rows,
    })
}

/// File name for one group's exported CSV, with path-hostile characters
/// replaced.
#[must_use]
pub fn export_file_name(group_key: &str) -> String {
    let safe: String = group_key
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();
    format!("{}.merged.csv", safe.trim())
}

fn csv_err(e: csv::Error) -> SeamError {
    SeamError::Csv {
        source: e,
        path: std::path::PathBuf::from("<writer>"),
    }
}
