//! Read-through cache for loaded team tables
//!
//! Keyed by source path plus modification time; a table is reloaded only when
//! the file changes on disk. Invalidation is explicit and observable, not a
//! process-global decorator.

use crate::data::table::Table;
use crate::data::teams::TeamTable;
use crate::Result;
use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

#[derive(Debug, Default)]
pub struct TableCache {
    entries: HashMap<PathBuf, CachedTable>,
}

#[derive(Debug)]
struct CachedTable {
    modified: SystemTime,
    table: Arc<TeamTable>,
}

impl TableCache {
    pub fn new() -> Self {
        TableCache::default()
    }

    /// Load the team table at `path`, reusing the cached copy unless the
    /// file's modification time changed.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<Arc<TeamTable>> {
        let path = path.as_ref();
        let modified = std::fs::metadata(path)?
            .modified()
            .unwrap_or(SystemTime::UNIX_EPOCH);

        if let Some(entry) = self.entries.get(path) {
            if entry.modified == modified {
                debug!("table cache hit for {}", path.display());
                return Ok(Arc::clone(&entry.table));
            }
        }

        debug!("loading team table from {}", path.display());
        let table = Table::from_path(path)?;
        let teams = Arc::new(TeamTable::from_table(&table)?);
        self.entries.insert(
            path.to_path_buf(),
            CachedTable {
                modified,
                table: Arc::clone(&teams),
            },
        );
        Ok(teams)
    }

    /// Drop every cached table.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "Teams,Conference,Points\nDuke,ACC,81\n";

    #[test]
    fn second_load_hits_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.csv");
        std::fs::write(&path, CSV).unwrap();

        let mut cache = TableCache::new();
        let first = cache.load(&path).unwrap();
        let second = cache.load(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn mtime_change_invalidates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.csv");
        std::fs::write(&path, CSV).unwrap();

        let mut cache = TableCache::new();
        let first = cache.load(&path).unwrap();

        // Rewrite with a bumped mtime so the cache must reload
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"Teams,Conference,Points\nDuke,ACC,81\nUNC,ACC,79\n")
            .unwrap();
        drop(file);
        let future = SystemTime::now() + std::time::Duration::from_secs(5);
        file_set_mtime(&path, future);

        let second = cache.load(&path).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 2);
    }

    fn file_set_mtime(path: &Path, to: SystemTime) {
        let file = std::fs::OpenOptions::new().write(true).open(path).unwrap();
        file.set_modified(to).unwrap();
    }
}
