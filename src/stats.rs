//! Period-over-period metrics.
//!
//! Compares the trailing window of a series against the window before it:
//! mean value in each, and percent change. Splits by breakdown value when the
//! table carries one.

use crate::table::{self, Table};
use chrono::Duration;
use std::collections::BTreeMap;

/// Label used when the table has no breakdown column.
pub const OVERALL: &str = "overall";

#[derive(Debug, Clone, PartialEq)]
pub struct PeriodMetric {
    pub breakdown: String,
    pub current_avg: Option<f64>,
    pub previous_avg: Option<f64>,
    /// `None` when either window is empty or the previous average is zero.
    pub pct_change: Option<f64>,
}

/// Computes current-vs-previous window means for `column` over the trailing
/// `period_days` days, anchored at the most recent timestamp in the table.
///
/// Missing cells never contribute to a mean. Returns one entry per breakdown
/// value (or a single [`OVERALL`] entry), ordered by breakdown.
#[must_use]
pub fn period_metrics(table: &Table, column: &str, period_days: i64) -> Vec<PeriodMetric> {
    let Some(col) = table.column_index(column) else {
        return Vec::new();
    };
    let Some(end) = table.rows.iter().map(|r| r.timestamp).max() else {
        return Vec::new();
    };
    let current_start = end - Duration::days(period_days);
    let previous_start = current_start - Duration::days(period_days);

    let mut current: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut previous: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for row in &table.rows {
        let Some(value) = row.values[col] else { continue };
        let key = row.breakdown.clone().unwrap_or_else(|| OVERALL.to_string());
        if row.timestamp > current_start && row.timestamp <= end {
            current.entry(key).or_default().push(value);
        } else if row.timestamp > previous_start && row.timestamp <= current_start {
            previous.entry(key).or_default().push(value);
        }
    }

    let mut keys: Vec<String> = current.keys().chain(previous.keys()).cloned().collect();
    keys.sort();
    keys.dedup();

    keys.into_iter()
        .map(|key| {
            let current_avg =
                table::mean(current.get(&key).into_iter().flatten().copied());
            let previous_avg =
                table::mean(previous.get(&key).into_iter().flatten().copied());
            let pct_change = match (current_avg, previous_avg) {
                (Some(c), Some(p)) if p != 0.0 => Some((c - p) / p * 100.0),
                _ => None,
            };
            PeriodMetric {
                breakdown: key,
                current_avg,
                previous_avg,
                pct_change,
            }
        })
        .collect()
}
