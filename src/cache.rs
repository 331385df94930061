//! Side cache for loaded tables.
//!
//! Purely a performance layer in front of [`crate::load::load_table`]: keys
//! are (path, mtime) so an edited file is never served stale, and results are
//! identical with or without the cache. Bounded, least-recently-used
//! eviction.

use crate::error::Result;
use crate::load;
use crate::table::Table;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub const DEFAULT_CAPACITY: usize = 20;

type CacheKey = (PathBuf, Option<SystemTime>);

struct Entry {
    table: Table,
    last_access: u64,
}

pub struct TableCache {
    entries: HashMap<CacheKey, Entry>,
    capacity: usize,
    tick: u64,
}

impl TableCache {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            tick: 0,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the table for `path`, loading it on a miss.
    ///
    /// # Errors
    /// Propagates loader errors; failures are never cached.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Table> {
        let key = cache_key(path);
        self.tick += 1;

        if let Some(entry) = self.entries.get_mut(&key) {
            entry.last_access = self.tick;
            return Ok(entry.table.clone());
        }

        let table = load::load_table(path)?;
        if self.entries.len() >= self.capacity {
            self.evict_lru();
        }
        self.entries.insert(
            key,
            Entry {
                table: table.clone(),
                last_access: self.tick,
            },
        );
        Ok(table)
    }

    fn evict_lru(&mut self) {
        let lru = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.last_access)
            .map(|(k, _)| k.clone());
        if let Some(key) = lru {
            self.entries.remove(&key);
        }
    }
}

impl Default for TableCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

fn cache_key(path: &Path) -> CacheKey {
    let mtime = std::fs::metadata(path).and_then(|m| m.modified()).ok();
    (path.to_path_buf(), mtime)
}
