// tests/unit_cache.rs
use csvseam_core::cache::TableCache;
use csvseam_core::load::load_table;
use std::fs;
use std::path::PathBuf;

fn write_csv(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, "Date,Value\n2025-03-22,1.0\n").unwrap();
    path
}

#[test]
fn cached_result_matches_direct_load() {
    let d = tempfile::tempdir().unwrap();
    let p = write_csv(&d, "m.csv");
    let mut cache = TableCache::new(4);

    let first = cache.get_or_load(&p).unwrap();
    let second = cache.get_or_load(&p).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, load_table(&p).unwrap());
    assert_eq!(cache.len(), 1);
}

#[test]
fn capacity_is_bounded_with_lru_eviction() {
    let d = tempfile::tempdir().unwrap();
    let a = write_csv(&d, "a.csv");
    let b = write_csv(&d, "b.csv");
    let c = write_csv(&d, "c.csv");
    let mut cache = TableCache::new(2);

    cache.get_or_load(&a).unwrap();
    cache.get_or_load(&b).unwrap();
    // Refresh a so b is the least recently used entry.
    cache.get_or_load(&a).unwrap();
    cache.get_or_load(&c).unwrap();
    assert_eq!(cache.len(), 2);
}

#[test]
fn load_failure_is_not_cached() {
    let d = tempfile::tempdir().unwrap();
    let p = d.path().join("late.csv");
    let mut cache = TableCache::new(4);

    assert!(cache.get_or_load(&p).is_err());
    assert!(cache.is_empty());

    fs::write(&p, "Date,Value\n2025-03-22,1.0\n").unwrap();
    assert!(cache.get_or_load(&p).is_ok());
}
