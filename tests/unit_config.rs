// tests/unit_config.rs
use csvseam_core::config::{Config, DuplicateStrategy};
use std::fs;

#[test]
fn defaults() {
    let c = Config::new();
    assert_eq!(c.cache_entries, 20);
    assert_eq!(c.data_directory, None);
    assert!(!c.aggregation.include_singleton_groups);
    assert!(!c.aggregation.attach_source_metadata);
    assert_eq!(c.aggregation.duplicate_strategy, DuplicateStrategy::Last);
}

#[test]
fn parse_toml_overrides_defaults() {
    let mut c = Config::new();
    c.parse_toml(
        "data_directory = \"/tmp/stats\"\ncache_entries = 5\n\n[aggregation]\ninclude_singleton_groups = true\nduplicate_strategy = \"average\"\n",
    );
    assert_eq!(c.data_directory.as_deref(), Some(std::path::Path::new("/tmp/stats")));
    assert_eq!(c.cache_entries, 5);
    assert!(c.aggregation.include_singleton_groups);
    assert_eq!(c.aggregation.duplicate_strategy, DuplicateStrategy::Average);
}

#[test]
fn partial_toml_keeps_other_defaults() {
    let mut c = Config::new();
    c.parse_toml("[aggregation]\nduplicate_strategy = \"first\"\n");
    assert_eq!(c.aggregation.duplicate_strategy, DuplicateStrategy::First);
    assert_eq!(c.cache_entries, 20);
}

#[test]
fn malformed_toml_is_ignored() {
    let mut c = Config::new();
    c.parse_toml("this is not toml ===");
    assert_eq!(c.cache_entries, 20);
}

#[test]
fn load_from_file() {
    let d = tempfile::tempdir().unwrap();
    let path = d.path().join("csvseam.toml");
    fs::write(&path, "[aggregation]\nattach_source_metadata = true\n").unwrap();
    let c = Config::load_from(&path);
    assert!(c.aggregation.attach_source_metadata);
}

#[test]
fn zero_cache_entries_fails_validation() {
    let mut c = Config::new();
    c.cache_entries = 0;
    assert!(c.validate().is_err());
    c.cache_entries = 1;
    assert!(c.validate().is_ok());
}
