//! Timestamp-indexed tabular data.
//!
//! A [`Table`] is an ordered sequence of rows keyed by timestamp, with named
//! numeric columns. A cell is `Option<f64>`: `None` is the explicit missing
//! marker, never a silent zero. An optional text `Breakdown` column splits a
//! metric into sub-series; when present it participates in row identity.

use chrono::{Datelike, Duration, NaiveDateTime};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub timestamp: NaiveDateTime,
    pub breakdown: Option<String>,
    /// Aligned with `Table::columns`.
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub timestamp_column: String,
    pub breakdown_column: Option<String>,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// Resampling bucket width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
}

impl Period {
    /// Bucket start for a timestamp: midnight of the day, the Monday of the
    /// week, or the first of the month.
    #[must_use]
    pub fn bucket(self, ts: NaiveDateTime) -> NaiveDateTime {
        let day = ts.date();
        let date = match self {
            Period::Day => day,
            Period::Week => {
                day - Duration::days(i64::from(day.weekday().num_days_from_monday()))
            }
            Period::Month => day.with_day(1).unwrap_or(day),
        };
        date.and_hms_opt(0, 0, 0).unwrap_or(ts)
    }
}

impl Table {
    #[must_use]
    pub fn new(timestamp_column: impl Into<String>) -> Self {
        Self {
            timestamp_column: timestamp_column.into(),
            breakdown_column: None,
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Returns the index of `name`, appending the column (and padding every
    /// existing row with the missing marker) when it is not present yet.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.column_index(name) {
            return idx;
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.values.push(None);
        }
        self.columns.len() - 1
    }

    /// Stable ascending sort by timestamp. Equal timestamps keep their
    /// current relative order.
    pub fn sort_rows(&mut self) {
        self.rows.sort_by_key(|r| r.timestamp);
    }

    /// Time-window filter: keeps rows with `from <= timestamp <= to`.
    #[must_use]
    pub fn slice(&self, from: Option<NaiveDateTime>, to: Option<NaiveDateTime>) -> Table {
        let mut out = self.clone();
        out.rows.retain(|r| {
            from.map_or(true, |f| r.timestamp >= f) && to.map_or(true, |t| r.timestamp <= t)
        });
        out
    }

    /// Mean-aggregates rows into `period` buckets, per breakdown value.
    /// A bucket/column with no present values stays missing.
    #[must_use]
    pub fn resample(&self, period: Period) -> Table {
        type Key = (NaiveDateTime, Option<String>);
        let mut buckets: BTreeMap<Key, Vec<&Row>> = BTreeMap::new();
        for row in &self.rows {
            buckets
                .entry((period.bucket(row.timestamp), row.breakdown.clone()))
                .or_default()
                .push(row);
        }

        let mut out = Table {
            timestamp_column: self.timestamp_column.clone(),
            breakdown_column: self.breakdown_column.clone(),
            columns: self.columns.clone(),
            rows: Vec::with_capacity(buckets.len()),
        };
        for ((timestamp, breakdown), members) in buckets {
            let values = (0..self.columns.len())
                .map(|i| mean(members.iter().filter_map(|r| r.values[i])))
                .collect();
            out.rows.push(Row {
                timestamp,
                breakdown,
                values,
            });
        }
        out
    }

    /// Deterministic thinning to at most `max_points` rows. Keeps the first
    /// and last row, then each column's extreme rows, then fills the
    /// remaining budget with evenly spaced rows; under a budget too tight
    /// for all of those, earlier categories win. No randomness: identical
    /// inputs always survive identically.
    #[must_use]
    pub fn downsample(&self, max_points: usize) -> Table {
        let n = self.rows.len();
        if n <= max_points || max_points == 0 {
            return self.clone();
        }

        let mut keep: BTreeSet<usize> = BTreeSet::new();
        keep.insert(0);
        if keep.len() < max_points {
            keep.insert(n - 1);
        }
        for col in 0..self.columns.len() {
            for found in [
                extreme(&self.rows, col, f64::gt),
                extreme(&self.rows, col, f64::lt),
            ] {
                if let Some(idx) = found {
                    if keep.len() < max_points {
                        keep.insert(idx);
                    }
                }
            }
        }

        // Even spread over the full index range; collisions with already
        // pinned rows just leave the budget underspent.
        let budget = max_points.saturating_sub(keep.len());
        for k in 0..budget {
            if keep.len() >= max_points {
                break;
            }
            keep.insert(k * (n - 1) / budget);
        }

        let mut out = self.clone();
        out.rows = keep.into_iter().map(|i| self.rows[i].clone()).collect();
        out
    }
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// First row index holding the extreme value of `col` under `better`.
fn extreme(rows: &[Row], col: usize, better: fn(&f64, &f64) -> bool) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, row) in rows.iter().enumerate() {
        let Some(v) = row.values[col] else { continue };
        match best {
            Some((_, b)) if better(&v, &b) => best = Some((idx, v)),
            None => best = Some((idx, v)),
            _ => {}
        }
    }
    best.map(|(idx, _)| idx)
}
