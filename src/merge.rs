//! The aggregation engine.
//!
//! Merges the member files of one [`FileGroup`] into a single chronologically
//! ordered [`Table`]: schemas are unioned (missing columns stay missing),
//! rows are sorted by timestamp with the source file's window start as the
//! tie-breaking key, and colliding timestamps are resolved under the
//! configured [`DuplicateStrategy`]. Groups are independent: one group's
//! failure never touches another's result.

use crate::cache::TableCache;
use crate::config::{AggregationConfig, DuplicateStrategy};
use crate::error::Result;
use crate::group::FileGroup;
use crate::load;
use crate::table::{self, Row, Table};
use rayon::prelude::*;
use std::path::Path;

/// Source label recorded for rows synthesized by averaging.
pub const COMBINED_LABEL: &str = "combined";

/// Fallback timestamp column name for datasets with no loadable members.
const DEFAULT_TIMESTAMP_COLUMN: &str = "Date";

/// One group's aggregated output: the merged table plus, when requested,
/// a per-row record of which source file won each timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub group: String,
    pub table: Table,
    /// Aligned with `table.rows` when source metadata is attached.
    pub sources: Option<Vec<String>>,
}

/// Per-group merge result; failure context stays with the group key.
#[derive(Debug)]
pub struct GroupOutcome {
    pub key: String,
    pub result: Result<Option<Dataset>>,
}

/// Merges one group, loading members directly from disk.
///
/// Returns `Ok(None)` for singleton groups when
/// `include_singleton_groups` is off.
///
/// # Errors
/// Any member that fails to load (malformed, unreadable) aborts this group.
pub fn merge_group(group: &FileGroup, config: AggregationConfig) -> Result<Option<Dataset>> {
    merge_with(group, config, &mut load::load_table)
}

/// Merges one group through a [`TableCache`]; the sequential pipeline uses
/// this so repeated runs over the same files skip re-parsing.
///
/// # Errors
/// Same contract as [`merge_group`].
pub fn merge_group_cached(
    group: &FileGroup,
    config: AggregationConfig,
    cache: &mut TableCache,
) -> Result<Option<Dataset>> {
    merge_with(group, config, &mut |path| cache.get_or_load(path))
}

/// Merges every group. Groups share no state, so with more than one group
/// the work fans out over rayon; output order matches input order either way.
#[must_use]
pub fn merge_all(groups: &[FileGroup], config: AggregationConfig) -> Vec<GroupOutcome> {
    let run = |group: &FileGroup| GroupOutcome {
        key: group.key.clone(),
        result: merge_group(group, config),
    };
    if groups.len() > 1 {
        groups.par_iter().map(run).collect()
    } else {
        groups.iter().map(run).collect()
    }
}

fn merge_with(
    group: &FileGroup,
    config: AggregationConfig,
    load: &mut dyn FnMut(&Path) -> Result<Table>,
) -> Result<Option<Dataset>> {
    if group.is_singleton() && !config.include_singleton_groups {
        return Ok(None);
    }

    // Members arrive start-ascending from the grouper; member index is the
    // duplicate-resolution tie-breaker from here on.
    let mut tables = Vec::with_capacity(group.members.len());
    for member in &group.members {
        tables.push((member, load(&member.path)?));
    }

    let mut out = Table::new(
        tables
            .first()
            .map_or(DEFAULT_TIMESTAMP_COLUMN, |(_, t)| t.timestamp_column.as_str()),
    );
    out.breakdown_column = tables
        .iter()
        .find_map(|(_, t)| t.breakdown_column.clone());
    for (_, t) in &tables {
        for col in &t.columns {
            out.ensure_column(col);
        }
    }

    let mut combined = concat_rows(&tables, &out.columns);
    // Stable: rows from earlier-starting files stay first within a collision.
    combined.sort_by(|a, b| {
        (a.row.timestamp, a.row.breakdown.as_deref())
            .cmp(&(b.row.timestamp, b.row.breakdown.as_deref()))
    });

    let mut sources = config.attach_source_metadata.then(Vec::new);
    let mut run_start = 0;
    while run_start < combined.len() {
        let run_end = end_of_run(&combined, run_start);
        let (row, label) = resolve(&combined[run_start..run_end], config.duplicate_strategy);
        out.rows.push(row);
        if let Some(sources) = sources.as_mut() {
            sources.push(label);
        }
        run_start = run_end;
    }

    Ok(Some(Dataset {
        group: group.key.clone(),
        table: out,
        sources,
    }))
}

/// A source row remapped onto the union schema, carrying its source label.
struct TaggedRow {
    row: Row,
    label: String,
}

fn concat_rows(
    tables: &[(&crate::scan::ScannedFile, Table)],
    columns: &[String],
) -> Vec<TaggedRow> {
    let mut combined = Vec::new();
    for (member, table) in tables {
        let mapping: Vec<Option<usize>> = columns
            .iter()
            .map(|c| table.column_index(c))
            .collect();
        for row in &table.rows {
            let values = mapping
                .iter()
                .map(|idx| idx.and_then(|i| row.values[i]))
                .collect();
            combined.push(TaggedRow {
                row: Row {
                    timestamp: row.timestamp,
                    breakdown: row.breakdown.clone(),
                    values,
                },
                label: member.source_label().to_string(),
            });
        }
    }
    combined
}

fn end_of_run(rows: &[TaggedRow], start: usize) -> usize {
    let key = (
        rows[start].row.timestamp,
        rows[start].row.breakdown.as_deref(),
    );
    rows[start..]
        .iter()
        .position(|r| (r.row.timestamp, r.row.breakdown.as_deref()) != key)
        .map_or(rows.len(), |offset| start + offset)
}

/// Collapses one run of timestamp-colliding rows into a single output row.
fn resolve(run: &[TaggedRow], strategy: DuplicateStrategy) -> (Row, String) {
    match strategy {
        DuplicateStrategy::First => {
            let first = &run[0];
            (first.row.clone(), first.label.clone())
        }
        DuplicateStrategy::Last => {
            let last = &run[run.len() - 1];
            (last.row.clone(), last.label.clone())
        }
        DuplicateStrategy::Average => {
            if run.len() == 1 {
                return (run[0].row.clone(), run[0].label.clone());
            }
            let width = run[0].row.values.len();
            let values: Vec<Option<f64>> = (0..width)
                .map(|i| table::mean(run.iter().filter_map(|r| r.row.values[i])))
                .collect();
            let row = Row {
                timestamp: run[0].row.timestamp,
                breakdown: run[0].row.breakdown.clone(),
                values,
            };
            (row, COMBINED_LABEL.to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeSummary {
    pub merged: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl MergeSummary {
    #[must_use]
    pub fn of(outcomes: &[GroupOutcome]) -> Self {
        let mut summary = Self {
            merged: 0,
            skipped: 0,
            failed: 0,
        };
        for outcome in outcomes {
            match &outcome.result {
                Ok(Some(_)) => summary.merged += 1,
                Ok(None) => summary.skipped += 1,
                Err(_) => summary.failed += 1,
            }
        }
        summary
    }
}
