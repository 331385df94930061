//! Directory scanning.
//!
//! Walks a directory tree for `.csv` files and attaches whatever identity can
//! be recovered: a [`FileDescriptor`] parsed from the file name, and week
//! metadata from folders named `Week<N>[<start>_<end>]` as a fallback time
//! window for files that carry no dates of their own.

use crate::error::{Result, SeamError};
use crate::pattern::{self, FileDescriptor};
use chrono::NaiveDateTime;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

/// Time window parsed from a weekly folder name.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekInfo {
    pub number: u32,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// One CSV file found during a scan.
#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub descriptor: Option<FileDescriptor>,
    pub week: Option<WeekInfo>,
}

impl ScannedFile {
    /// Group identity: the parsed metric name, or the raw file name for
    /// files outside the naming convention.
    #[must_use]
    pub fn group_key(&self) -> &str {
        self.descriptor
            .as_ref()
            .map_or(self.name.as_str(), |d| d.metric.as_str())
    }

    /// Parsed window start, used as the secondary ordering key everywhere.
    #[must_use]
    pub fn start(&self) -> Option<NaiveDateTime> {
        self.descriptor.as_ref().map(|d| d.start)
    }

    /// Label recorded in source-metadata columns: the identifier when the
    /// name carried one, otherwise the file name.
    #[must_use]
    pub fn source_label(&self) -> &str {
        self.descriptor
            .as_ref()
            .and_then(|d| d.identifier.as_deref())
            .unwrap_or(self.name.as_str())
    }
}

static WEEK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Week(\d+)\[(\d{4}-\d{1,2}-\d{1,2})_(\d{4}-\d{1,2}-\d{1,2})\]")
        .unwrap_or_else(|_| panic!("Invalid Regex"))
});

/// Parses week metadata out of a folder name, if it follows the convention.
#[must_use]
pub fn parse_week_folder(folder_name: &str) -> Option<WeekInfo> {
    let caps = WEEK_RE.captures(folder_name)?;
    let number = caps[1].parse().ok()?;
    let start = pattern::parse_stamp(&caps[2])?;
    let end = pattern::parse_stamp(&caps[3])?;
    Some(WeekInfo { number, start, end })
}

/// Scans `dir` recursively for CSV files.
///
/// Output ordering is deterministic: by group key, then window start, then
/// file name.
///
/// # Errors
/// Returns `SeamError::Io` when the directory does not exist or cannot be
/// read.
pub fn scan_directory(dir: &Path) -> Result<Vec<ScannedFile>> {
    if !dir.is_dir() {
        return Err(SeamError::Io {
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "directory does not exist",
            ),
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_csv(entry.path()) {
            continue;
        }
        files.push(scan_file(entry.path()));
    }

    files.sort_by(|a, b| {
        (a.group_key(), a.start(), &a.name).cmp(&(b.group_key(), b.start(), &b.name))
    });
    Ok(files)
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .map_or(false, |e| e.eq_ignore_ascii_case("csv"))
}

fn scan_file(path: &Path) -> ScannedFile {
    let name = path
        .file_name()
        .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
    let metadata = std::fs::metadata(path).ok();

    let week = path
        .parent()
        .and_then(Path::file_name)
        .and_then(|n| parse_week_folder(&n.to_string_lossy()));

    // Week folder dates stand in for files whose names carry no window.
    let descriptor = pattern::parse_file_name(path).or_else(|| {
        week.as_ref().map(|w| FileDescriptor {
            metric: pattern::file_stem(path),
            identifier: None,
            start: w.start,
            end: w.end,
        })
    });

    ScannedFile {
        path: path.to_path_buf(),
        name,
        size: metadata.as_ref().map_or(0, std::fs::Metadata::len),
        descriptor,
        week,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_folder_convention() {
        let w = parse_week_folder("Week12[2025-03-22_2025-3-29]").unwrap();
        assert_eq!(w.number, 12);
        assert_eq!(w.start, pattern::parse_stamp("2025-03-22").unwrap());
        assert_eq!(w.end, pattern::parse_stamp("2025-03-29").unwrap());
    }

    #[test]
    fn non_week_folder_is_none() {
        assert_eq!(parse_week_folder("Statistics"), None);
    }
}
