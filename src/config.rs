//! Tool configuration.
//!
//! `csvseam.toml` in the working directory supplies defaults; CLI flags
//! override it. The aggregation knobs travel as a plain value
//! ([`AggregationConfig`]) into the merge engine so the algorithm never reads
//! ambient state.

use crate::cache;
use crate::error::Result;
use anyhow::Context;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "csvseam.toml";

/// Policy for rows that claim the same timestamp after merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateStrategy {
    /// Keep the row from the file whose window starts earliest.
    First,
    /// Keep the row from the file whose window starts latest.
    #[default]
    Last,
    /// Per-column arithmetic mean of the non-missing colliding values.
    Average,
}

/// Knobs for one aggregation run. Passed by value, never mutated.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    pub include_singleton_groups: bool,
    pub attach_source_metadata: bool,
    pub duplicate_strategy: DuplicateStrategy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_directory: Option<PathBuf>,
    pub cache_entries: usize,
    pub aggregation: AggregationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_directory: None,
            cache_entries: cache::DEFAULT_CAPACITY,
            aggregation: AggregationConfig::default(),
        }
    }
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config and folds in `csvseam.toml` from the working
    /// directory when present. A missing or unreadable file is not an error;
    /// a present but invalid file is ignored with defaults kept.
    #[must_use]
    pub fn load() -> Self {
        let mut config = Self::new();
        if let Ok(content) = std::fs::read_to_string(CONFIG_FILE) {
            config.parse_toml(&content);
        }
        config
    }

    /// Like [`Config::load`] but reading an explicit file path.
    #[must_use]
    pub fn load_from(path: &Path) -> Self {
        let mut config = Self::new();
        if let Ok(content) = std::fs::read_to_string(path) {
            config.parse_toml(&content);
        }
        config
    }

    /// Overlays values parsed from TOML onto `self`. Malformed content is
    /// ignored rather than fatal: a broken settings file must not stop a run.
    pub fn parse_toml(&mut self, content: &str) {
        if let Ok(parsed) = toml::from_str::<Config>(content) {
            *self = parsed;
        }
    }

    /// Saves the current configuration to `csvseam.toml`.
    ///
    /// # Errors
    /// Returns error if serialization or the file write fails.
    pub fn save(&self) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self).context("serializing config")?;
        std::fs::write(CONFIG_FILE, content).context("writing csvseam.toml")?;
        Ok(())
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns an error when a field holds an unusable value.
    pub fn validate(&self) -> Result<()> {
        if self.cache_entries == 0 {
            return Err(crate::error::SeamError::Other(
                "cache_entries must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
