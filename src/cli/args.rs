use crate::config::DuplicateStrategy;
use crate::table::Period;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "csvseam", version, about = "Stitches windowed CSV exports into continuous series")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List metric groups found in a directory
    Scan {
        /// Directory to scan (default: data_directory from csvseam.toml)
        dir: Option<PathBuf>,
        /// Also list singleton groups
        #[arg(long)]
        all: bool,
    },
    /// Merge every group into continuous, deduplicated datasets
    Merge {
        /// Directory to scan (default: data_directory from csvseam.toml)
        dir: Option<PathBuf>,
        /// Duplicate-timestamp resolution strategy
        #[arg(long, value_enum)]
        strategy: Option<DuplicateStrategy>,
        /// Also merge groups with a single file
        #[arg(long)]
        singletons: bool,
        /// Attach a per-row source-file column
        #[arg(long)]
        sources: bool,
        /// Write one merged CSV per group into this directory
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
        /// Print merged datasets as JSON instead of a summary
        #[arg(long)]
        json: bool,
        /// Keep only rows at or after this timestamp
        #[arg(long, value_name = "DATETIME")]
        from: Option<String>,
        /// Keep only rows at or before this timestamp
        #[arg(long, value_name = "DATETIME")]
        to: Option<String>,
        /// Mean-resample rows into fixed buckets
        #[arg(long, value_enum)]
        period: Option<Period>,
        /// Deterministically thin each dataset to at most N rows
        #[arg(long, value_name = "N")]
        max_points: Option<usize>,
        #[arg(long, short)]
        verbose: bool,
    },
    /// Period-over-period averages for one column across all groups
    Stats {
        /// Directory to scan (default: data_directory from csvseam.toml)
        dir: Option<PathBuf>,
        /// Column to average
        #[arg(long)]
        column: String,
        /// Window length in days
        #[arg(long, default_value = "30")]
        days: i64,
        /// Duplicate-timestamp resolution strategy
        #[arg(long, value_enum)]
        strategy: Option<DuplicateStrategy>,
    },
    /// Inspect a single CSV file
    Info {
        file: PathBuf,
    },
    /// Write a csvseam.toml with the current (or default) settings
    Init {
        /// Default data directory to record in the config
        dir: Option<PathBuf>,
    },
}
