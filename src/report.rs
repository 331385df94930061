//! Console reporting.

use crate::group::FileGroup;
use crate::merge::{GroupOutcome, MergeSummary};
use crate::stats::PeriodMetric;
use colored::Colorize;

/// Prints the scan listing: one line per group with member count and span.
/// Singleton groups are dimmed unless `all` is set, mirroring how the merge
/// step treats them.
pub fn print_groups(groups: &[FileGroup], all: bool) {
    let multi = groups.iter().filter(|g| !g.is_singleton()).count();
    println!(
        "{} groups ({} aggregatable)",
        groups.len().to_string().bold(),
        multi.to_string().cyan()
    );

    for group in groups {
        let files = format!(
            "{} file{}",
            group.members.len(),
            if group.is_singleton() { "" } else { "s" }
        );
        let line = format!(
            "  {} [{}, {}]",
            group.display_name(),
            files,
            human_size(group.total_size())
        );
        if group.is_singleton() {
            if all {
                println!("{}", line.dimmed());
            }
        } else {
            println!("{line}");
        }
    }
}

fn human_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes} B")
    }
}

/// Prints per-group merge outcomes. Returns true when every group either
/// merged or was skipped; failures carry the group key and offending path in
/// the error itself.
pub fn print_outcomes(outcomes: &[GroupOutcome], verbose: bool) -> bool {
    for outcome in outcomes {
        match &outcome.result {
            Ok(Some(dataset)) => {
                let shape = format!(
                    "{} rows x {} columns",
                    dataset.table.rows.len(),
                    dataset.table.columns.len()
                );
                println!("{} {}: {}", "✓".green(), outcome.key, shape);
            }
            Ok(None) => {
                if verbose {
                    println!("{} {}: singleton, skipped", "-".dimmed(), outcome.key.dimmed());
                }
            }
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red().bold(), outcome.key.red(), e);
            }
        }
    }

    let summary = MergeSummary::of(outcomes);
    let tally = format!(
        "{} merged, {} skipped, {} failed",
        summary.merged, summary.skipped, summary.failed
    );
    if summary.failed > 0 {
        println!("{}", tally.red().bold());
    } else {
        println!("{}", tally.green());
    }
    summary.failed == 0
}

/// Prints period-over-period metrics for one group.
pub fn print_period_metrics(group_key: &str, column: &str, metrics: &[PeriodMetric]) {
    println!("{} [{}]", group_key.bold(), column.cyan());
    for m in metrics {
        let fmt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v:.3}"));
        let change = m.pct_change.map_or_else(
            || "-".normal(),
            |p| {
                let s = format!("{p:+.1}%");
                if p >= 0.0 {
                    s.green()
                } else {
                    s.red()
                }
            },
        );
        println!(
            "  {}: {} -> {} ({})",
            m.breakdown,
            fmt(m.previous_avg),
            fmt(m.current_avg),
            change
        );
    }
}
