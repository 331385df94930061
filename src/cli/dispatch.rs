//! Command handlers. CLI flags override `csvseam.toml` values; every handler
//! returns a process exit code so per-group failures surface without aborting
//! the run.

use crate::cache::TableCache;
use crate::cli::args::{Cli, Commands};
use crate::config::{AggregationConfig, Config, DuplicateStrategy};
use crate::table::Period;
use crate::{export, group, load, merge, pattern, report, scan, stats};
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDateTime;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Runs the parsed command line.
///
/// # Errors
/// Returns an error only for whole-run failures (bad arguments, unreadable
/// directory); per-group merge failures are reported and folded into the
/// exit code instead.
pub fn run(cli: Cli) -> Result<i32> {
    let config = Config::load();
    config.validate().map_err(|e| anyhow!(e.to_string()))?;

    match cli.command {
        Commands::Scan { dir, all } => {
            let dir = resolve_dir(dir, &config)?;
            let groups = group::group_files(scan::scan_directory(&dir)?);
            report::print_groups(&groups, all);
            Ok(0)
        }
        Commands::Merge {
            dir,
            strategy,
            singletons,
            sources,
            out,
            json,
            from,
            to,
            period,
            max_points,
            verbose,
        } => {
            let dir = resolve_dir(dir, &config)?;
            let agg = override_aggregation(config.aggregation, strategy, singletons, sources);
            let window = (parse_bound(from.as_deref())?, parse_bound(to.as_deref())?);
            run_merge(&dir, agg, out.as_deref(), json, window, period, max_points, verbose)
        }
        Commands::Stats {
            dir,
            column,
            days,
            strategy,
        } => {
            let dir = resolve_dir(dir, &config)?;
            let mut agg = config.aggregation;
            agg.include_singleton_groups = true;
            if let Some(strategy) = strategy {
                agg.duplicate_strategy = strategy;
            }
            run_stats(&dir, &config, agg, &column, days)
        }
        Commands::Info { file } => run_info(&file),
        Commands::Init { dir } => {
            let mut config = config;
            if dir.is_some() {
                config.data_directory = dir;
            }
            config.save()?;
            println!("wrote {}", crate::config::CONFIG_FILE.cyan());
            Ok(0)
        }
    }
}

fn resolve_dir(dir: Option<PathBuf>, config: &Config) -> Result<PathBuf> {
    dir.or_else(|| config.data_directory.clone())
        .ok_or_else(|| anyhow!("no directory given and no data_directory in csvseam.toml"))
}

fn override_aggregation(
    mut agg: AggregationConfig,
    strategy: Option<DuplicateStrategy>,
    singletons: bool,
    sources: bool,
) -> AggregationConfig {
    if let Some(strategy) = strategy {
        agg.duplicate_strategy = strategy;
    }
    agg.include_singleton_groups |= singletons;
    agg.attach_source_metadata |= sources;
    agg
}

fn parse_bound(value: Option<&str>) -> Result<Option<NaiveDateTime>> {
    match value {
        None => Ok(None),
        Some(s) => pattern::parse_stamp(s)
            .map(Some)
            .ok_or_else(|| anyhow!("unrecognized datetime: {s}")),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_merge(
    dir: &Path,
    agg: AggregationConfig,
    out: Option<&Path>,
    json: bool,
    window: (Option<NaiveDateTime>, Option<NaiveDateTime>),
    period: Option<Period>,
    max_points: Option<usize>,
    verbose: bool,
) -> Result<i32> {
    let groups = group::group_files(scan::scan_directory(dir)?);
    let mut outcomes = merge::merge_all(&groups, agg);

    // Post-merge shaping: window filter, resample, thinning.
    for outcome in &mut outcomes {
        if let Ok(Some(dataset)) = &mut outcome.result {
            if window.0.is_some() || window.1.is_some() {
                dataset.table = dataset.table.slice(window.0, window.1);
                dataset.sources = None;
            }
            if let Some(period) = period {
                dataset.table = dataset.table.resample(period);
                dataset.sources = None;
            }
            if let Some(max) = max_points {
                dataset.table = dataset.table.downsample(max);
                dataset.sources = None;
            }
        }
    }

    if let Some(out_dir) = out {
        std::fs::create_dir_all(out_dir).context("creating output directory")?;
        for outcome in &outcomes {
            if let Ok(Some(dataset)) = &outcome.result {
                let path = out_dir.join(export::export_file_name(&dataset.group));
                export::write_csv_file(dataset, &path)?;
                if verbose {
                    println!("wrote {}", path.display().to_string().cyan());
                }
            }
        }
    }

    if json {
        let datasets: Vec<_> = outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().and_then(Option::as_ref))
            .map(export::to_json)
            .collect();
        println!("{}", serde_json::to_string_pretty(&datasets)?);
        let failed = outcomes.iter().any(|o| o.result.is_err());
        for outcome in &outcomes {
            if let Err(e) = &outcome.result {
                eprintln!("{} {}: {}", "✗".red().bold(), outcome.key, e);
            }
        }
        return Ok(i32::from(failed));
    }

    let clean = report::print_outcomes(&outcomes, verbose);
    Ok(i32::from(!clean))
}

fn run_stats(
    dir: &Path,
    config: &Config,
    agg: AggregationConfig,
    column: &str,
    days: i64,
) -> Result<i32> {
    let groups = group::group_files(scan::scan_directory(dir)?);
    let mut cache = TableCache::new(config.cache_entries);

    let mut failed = false;
    for group in &groups {
        match merge::merge_group_cached(group, agg, &mut cache) {
            Ok(Some(dataset)) => {
                let metrics = stats::period_metrics(&dataset.table, column, days);
                if !metrics.is_empty() {
                    report::print_period_metrics(&group.key, column, &metrics);
                }
            }
            Ok(None) => {}
            Err(e) => {
                failed = true;
                eprintln!("{} {}: {}", "✗".red().bold(), group.key.red(), e);
            }
        }
    }
    Ok(i32::from(failed))
}

fn run_info(file: &Path) -> Result<i32> {
    let table = load::load_table(file)?;
    println!("{}", file.display().to_string().bold());
    println!("  timestamp column: {}", table.timestamp_column.cyan());
    if let Some(b) = &table.breakdown_column {
        println!("  breakdown column: {}", b.cyan());
    }
    println!("  series columns:   {}", table.columns.join(", "));
    println!("  rows:             {}", table.rows.len());
    if let (Some(first), Some(last)) = (table.rows.first(), table.rows.last()) {
        println!(
            "  span:             {} to {}",
            first.timestamp, last.timestamp
        );
    }
    if let Some(descriptor) = pattern::parse_file_name(file) {
        println!(
            "  metric:           {} ({} to {})",
            descriptor.metric.cyan(),
            descriptor.start,
            descriptor.end
        );
    } else {
        println!("  metric:           {}", "not parseable from name".dimmed());
    }
    Ok(0)
}
