// tests/unit_group.rs
use csvseam_core::group::group_files;
use csvseam_core::scan::scan_directory;
use std::fs;
use std::path::Path;

fn touch_csv(dir: &Path, name: &str) {
    fs::write(dir.join(name), "Date,Value\n2025-03-22,1.0\n").unwrap();
}

#[test]
fn partition_by_metric_name() {
    let d = tempfile::tempdir().unwrap();
    touch_csv(d.path(), "CrashRate - App1, 2025-03-22 to 2025-03-25.csv");
    touch_csv(d.path(), "CrashRate - App2, 2025-03-24 to 2025-03-29.csv");
    touch_csv(d.path(), "Sessions - App1, 2025-03-22 to 2025-03-25.csv");

    let groups = group_files(scan_directory(d.path()).unwrap());
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].key, "CrashRate");
    assert_eq!(groups[0].members.len(), 2);
    assert_eq!(groups[1].key, "Sessions");
    assert!(groups[1].is_singleton());
}

#[test]
fn metric_comparison_is_case_sensitive() {
    let d = tempfile::tempdir().unwrap();
    touch_csv(d.path(), "CrashRate - A, 2025-03-22 to 2025-03-25.csv");
    touch_csv(d.path(), "crashrate - B, 2025-03-24 to 2025-03-29.csv");

    let groups = group_files(scan_directory(d.path()).unwrap());
    assert_eq!(groups.len(), 2);
}

#[test]
fn unparsable_name_is_its_own_group_keyed_by_raw_name() {
    let d = tempfile::tempdir().unwrap();
    touch_csv(d.path(), "Session time- SessionDurationSeconds.csv");

    let groups = group_files(scan_directory(d.path()).unwrap());
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].key, "Session time- SessionDurationSeconds.csv");
    assert!(groups[0].is_singleton());
    assert_eq!(groups[0].span, None);
}

#[test]
fn same_raw_name_in_different_folders_stays_two_singletons() {
    let d = tempfile::tempdir().unwrap();
    let (a, b) = (d.path().join("a"), d.path().join("b"));
    fs::create_dir(&a).unwrap();
    fs::create_dir(&b).unwrap();
    touch_csv(&a, "oddball.csv");
    touch_csv(&b, "oddball.csv");

    let groups = group_files(scan_directory(d.path()).unwrap());
    assert_eq!(groups.len(), 2);
    assert!(groups.iter().all(|g| g.is_singleton()));
    assert_ne!(groups[0].key, groups[1].key);
}

#[test]
fn members_ordered_by_start_ascending() {
    let d = tempfile::tempdir().unwrap();
    touch_csv(d.path(), "M - b, 2025-03-24 to 2025-03-29.csv");
    touch_csv(d.path(), "M - a, 2025-03-22 to 2025-03-25.csv");

    let groups = group_files(scan_directory(d.path()).unwrap());
    let starts: Vec<_> = groups[0].members.iter().filter_map(|m| m.start()).collect();
    assert!(starts.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn span_covers_min_start_max_end() {
    let d = tempfile::tempdir().unwrap();
    touch_csv(d.path(), "M - a, 2025-03-22 to 2025-03-25.csv");
    touch_csv(d.path(), "M - b, 2025-03-24 to 2025-03-29.csv");

    let groups = group_files(scan_directory(d.path()).unwrap());
    let (start, end) = groups[0].span.unwrap();
    assert_eq!(start.format("%Y-%m-%d").to_string(), "2025-03-22");
    assert_eq!(end.format("%Y-%m-%d").to_string(), "2025-03-29");
    assert_eq!(groups[0].display_name(), "M, 2025-03-22 to 2025-03-29");
}

#[test]
fn regrouping_is_deterministic() {
    let d = tempfile::tempdir().unwrap();
    touch_csv(d.path(), "B - x, 2025-03-22 to 2025-03-25.csv");
    touch_csv(d.path(), "A - x, 2025-03-22 to 2025-03-25.csv");
    touch_csv(d.path(), "A - y, 2025-03-24 to 2025-03-29.csv");
    touch_csv(d.path(), "oddball.csv");

    let first = group_files(scan_directory(d.path()).unwrap());
    let second = group_files(scan_directory(d.path()).unwrap());
    let keys: Vec<_> = first.iter().map(|g| g.key.clone()).collect();
    assert_eq!(keys, second.iter().map(|g| g.key.clone()).collect::<Vec<_>>());
    for (a, b) in first.iter().zip(&second) {
        let names_a: Vec<_> = a.members.iter().map(|m| m.name.clone()).collect();
        let names_b: Vec<_> = b.members.iter().map(|m| m.name.clone()).collect();
        assert_eq!(names_a, names_b);
    }
}

#[test]
fn week_folder_supplies_missing_window() {
    let d = tempfile::tempdir().unwrap();
    let week_dir = d.path().join("Week12[2025-03-22_2025-03-29]");
    fs::create_dir(&week_dir).unwrap();
    touch_csv(&week_dir, "undated export.csv");

    let files = scan_directory(d.path()).unwrap();
    assert_eq!(files.len(), 1);
    let descriptor = files[0].descriptor.as_ref().unwrap();
    assert_eq!(descriptor.metric, "undated export");
    assert_eq!(descriptor.start.format("%Y-%m-%d").to_string(), "2025-03-22");
    assert_eq!(files[0].week.as_ref().unwrap().number, 12);
}
