//! Filename convention parsing.
//!
//! Metric exports follow the convention
//! `<Metric Name> - <Identifier>, <Start> to <End>.csv`. Files that deviate
//! are not an error: they simply carry no descriptor and end up in their own
//! group keyed by the raw file name.

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Identity and time window parsed from a file name. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct FileDescriptor {
    pub metric: String,
    pub identifier: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

static METRIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+) - (.+), (.+) to (.+)$").unwrap_or_else(|_| panic!("Invalid Regex")));
static NO_IDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+), (.+) to (.+)$").unwrap_or_else(|_| panic!("Invalid Regex")));
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}-\d{1,2}-\d{1,2}").unwrap_or_else(|_| panic!("Invalid Regex")));
static WINDOW_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r",\s*\d{4}-\d{1,2}-\d{1,2}.*$").unwrap_or_else(|_| panic!("Invalid Regex"))
});

/// Parses a timestamp in any of the formats seen in export file names and
/// cells. Date-only values are taken as midnight.
#[must_use]
pub fn parse_stamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    const DATETIME_FMTS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        // Export style: 2025-03-22T08-30-00.000Z
        "%Y-%m-%dT%H-%M-%S%.fZ",
    ];
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    const DATE_FMTS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Returns the file stem used as group key for files outside the convention.
#[must_use]
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map_or_else(String::new, |s| s.to_string_lossy().into_owned())
}

/// Attempts to extract a [`FileDescriptor`] from a file name.
///
/// Tries the full convention first, then the identifier-less form, then falls
/// back to scanning the stem for bare `YYYY-MM-DD` dates (first date = start,
/// last date = end). Returns `None` when no time window can be recovered.
#[must_use]
pub fn parse_file_name(path: &Path) -> Option<FileDescriptor> {
    let stem = file_stem(path);

    if let Some(caps) = METRIC_RE.captures(&stem) {
        let start = parse_stamp(&caps[3]);
        let end = parse_stamp(&caps[4]);
        if let (Some(start), Some(end)) = (start, end) {
            return Some(FileDescriptor {
                metric: caps[1].trim().to_string(),
                identifier: Some(caps[2].trim().to_string()),
                start,
                end,
            });
        }
    }

    if let Some(caps) = NO_IDENT_RE.captures(&stem) {
        let start = parse_stamp(&caps[2]);
        let end = parse_stamp(&caps[3]);
        if let (Some(start), Some(end)) = (start, end) {
            return Some(FileDescriptor {
                metric: caps[1].trim().to_string(),
                identifier: None,
                start,
                end,
            });
        }
    }

    // Bare-date fallback: the stem minus any trailing `, <date>...` window
    // suffix is the metric identity, so timestamped exports of one metric
    // still land in the same group.
    let dates: Vec<NaiveDateTime> = DATE_RE
        .find_iter(&stem)
        .filter_map(|m| parse_stamp(m.as_str()))
        .collect();
    if let Some(&start) = dates.first() {
        let end = *dates.last().unwrap_or(&start);
        let metric = WINDOW_SUFFIX_RE.replace(&stem, "").trim().to_string();
        return Some(FileDescriptor {
            metric,
            identifier: None,
            start,
            end,
        });
    }

    None
}
