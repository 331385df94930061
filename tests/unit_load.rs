// tests/unit_load.rs
use csvseam_core::error::SeamError;
use csvseam_core::load::load_table;
use std::fs;
use std::path::PathBuf;

fn write_csv(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn timestamp_column_found_by_name() {
    let d = tempfile::tempdir().unwrap();
    let p = write_csv(&d, "m.csv", "Value,Date\n1.0,2025-03-22\n2.0,2025-03-23\n");
    let t = load_table(&p).unwrap();
    assert_eq!(t.timestamp_column, "Date");
    assert_eq!(t.columns, vec!["Value".to_string()]);
    assert_eq!(t.rows.len(), 2);
}

#[test]
fn timestamp_column_found_by_content() {
    let d = tempfile::tempdir().unwrap();
    let p = write_csv(&d, "m.csv", "When,Value\n2025-03-22,1.0\n2025-03-23,2.0\n");
    let t = load_table(&p).unwrap();
    assert_eq!(t.timestamp_column, "When");
}

#[test]
fn no_timestamp_column_is_malformed() {
    let d = tempfile::tempdir().unwrap();
    let p = write_csv(&d, "m.csv", "a,b\n1,2\n");
    match load_table(&p) {
        Err(SeamError::MalformedFile { path }) => assert_eq!(path, p),
        other => panic!("expected MalformedFile, got {other:?}"),
    }
}

#[test]
fn non_numeric_cell_becomes_missing() {
    let d = tempfile::tempdir().unwrap();
    let p = write_csv(&d, "m.csv", "Date,Value\n2025-03-22,oops\n2025-03-23,2.0\n");
    let t = load_table(&p).unwrap();
    assert_eq!(t.rows[0].values[0], None);
    assert_eq!(t.rows[1].values[0], Some(2.0));
}

#[test]
fn empty_cell_is_missing_not_zero() {
    let d = tempfile::tempdir().unwrap();
    let p = write_csv(&d, "m.csv", "Date,Value\n2025-03-22,\n");
    let t = load_table(&p).unwrap();
    assert_eq!(t.rows[0].values[0], None);
}

#[test]
fn rows_sorted_ascending_on_load() {
    let d = tempfile::tempdir().unwrap();
    let p = write_csv(
        &d,
        "m.csv",
        "Date,Value\n2025-03-24,3.0\n2025-03-22,1.0\n2025-03-23,2.0\n",
    );
    let t = load_table(&p).unwrap();
    let stamps: Vec<_> = t.rows.iter().map(|r| r.timestamp).collect();
    let mut sorted = stamps.clone();
    sorted.sort();
    assert_eq!(stamps, sorted);
}

#[test]
fn unparsable_timestamp_rows_are_dropped() {
    let d = tempfile::tempdir().unwrap();
    let p = write_csv(&d, "m.csv", "Date,Value\nnot-a-date,1.0\n2025-03-23,2.0\n");
    let t = load_table(&p).unwrap();
    assert_eq!(t.rows.len(), 1);
}

#[test]
fn breakdown_column_is_text_not_numeric() {
    let d = tempfile::tempdir().unwrap();
    let p = write_csv(
        &d,
        "m.csv",
        "Date,Breakdown,Value\n2025-03-22,iOS,1.0\n2025-03-22,Android,2.0\n",
    );
    let t = load_table(&p).unwrap();
    assert_eq!(t.breakdown_column.as_deref(), Some("Breakdown"));
    assert_eq!(t.columns, vec!["Value".to_string()]);
    assert_eq!(t.rows[0].breakdown.as_deref(), Some("iOS"));
}

#[test]
fn bom_header_is_stripped() {
    let d = tempfile::tempdir().unwrap();
    let p = write_csv(&d, "m.csv", "\u{feff}Date,Value\n2025-03-22,1.0\n");
    let t = load_table(&p).unwrap();
    assert_eq!(t.timestamp_column, "Date");
}

#[test]
fn datetime_cells_with_time_of_day() {
    let d = tempfile::tempdir().unwrap();
    let p = write_csv(&d, "m.csv", "Date,Value\n2025-03-22 08:30:00,1.0\n");
    let t = load_table(&p).unwrap();
    assert_eq!(
        t.rows[0].timestamp.format("%H:%M").to_string(),
        "08:30"
    );
}

#[test]
fn missing_file_is_io_error() {
    let d = tempfile::tempdir().unwrap();
    let p = d.path().join("nope.csv");
    assert!(matches!(load_table(&p), Err(SeamError::Io { .. })));
}
