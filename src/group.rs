//! Metric grouping.
//!
//! Partitions scanned files into groups sharing a metric identity. The
//! partition is a function of the parsed metric names only: the same input
//! set always produces the same groups in the same order.

use crate::scan::ScannedFile;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// Files believed to represent the same metric across time windows.
#[derive(Debug, Clone)]
pub struct FileGroup {
    /// Metric name, or the raw file name (path on collision) for files
    /// outside the convention.
    pub key: String,
    /// Sorted by window start ascending; undated members first, by name.
    pub members: Vec<ScannedFile>,
    /// (min start, max end) over members with parsed windows.
    pub span: Option<(NaiveDateTime, NaiveDateTime)>,
}

impl FileGroup {
    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }

    /// Human-facing name: `"<metric>, <start> to <end>"` when the overall
    /// window is known.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.span {
            Some((start, end)) => format!(
                "{}, {} to {}",
                self.key,
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d")
            ),
            None => self.key.clone(),
        }
    }

    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.members.iter().map(|m| m.size).sum()
    }
}

/// Buckets files by group key into one [`FileGroup`] per distinct key,
/// ordered by key. Files that failed filename parsing never share a group:
/// each becomes its own singleton keyed by raw file name, falling back to
/// the full path when that name collides with another key.
#[must_use]
pub fn group_files(files: Vec<ScannedFile>) -> Vec<FileGroup> {
    let mut buckets: BTreeMap<String, Vec<ScannedFile>> = BTreeMap::new();
    let mut loose: Vec<ScannedFile> = Vec::new();
    for file in files {
        if file.descriptor.is_some() {
            buckets
                .entry(file.group_key().to_string())
                .or_default()
                .push(file);
        } else {
            loose.push(file);
        }
    }

    let mut name_counts: BTreeMap<String, usize> = BTreeMap::new();
    for file in &loose {
        *name_counts.entry(file.name.clone()).or_default() += 1;
    }

    let mut groups: Vec<FileGroup> = buckets
        .into_iter()
        .map(|(key, mut members)| {
            members.sort_by(|a, b| (a.start(), &a.name).cmp(&(b.start(), &b.name)));
            let span = group_span(&members);
            FileGroup { key, members, span }
        })
        .collect();

    for file in loose {
        let ambiguous = name_counts.get(&file.name).copied().unwrap_or(0) > 1
            || groups.iter().any(|g| g.key == file.name);
        let key = if ambiguous {
            file.path.to_string_lossy().into_owned()
        } else {
            file.name.clone()
        };
        groups.push(FileGroup {
            key,
            members: vec![file],
            span: None,
        });
    }

    groups.sort_by(|a, b| a.key.cmp(&b.key));
    groups
}

fn group_span(members: &[ScannedFile]) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let start = members
        .iter()
        .filter_map(|m| m.descriptor.as_ref().map(|d| d.start))
        .min()?;
    let end = members
        .iter()
        .filter_map(|m| m.descriptor.as_ref().map(|d| d.end))
        .max()?;
    Some((start, end))
}
