use super::line::CacheLine;
use dashmap::DashMap;
use modscope_api::{ArtifactId, CacheStats};
use std::sync::Arc;

/// Concurrent root -> cache line map.
///
/// Writes are last-writer-wins; concurrent misses on the same key may both
/// recompute and both publish.
#[derive(Default)]
pub struct CacheStore {
    lines: DashMap<ArtifactId, Arc<CacheLine>>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ArtifactId) -> Option<Arc<CacheLine>> {
        self.lines.get(key).map(|line| line.value().clone())
    }

    /// Install `line`, orphaning any previous line for `key`.
    pub fn put(&self, key: ArtifactId, line: Arc<CacheLine>) {
        self.lines.insert(key, line);
    }

    /// Invalidate the line cached for `key`, if any.
    pub fn invalidate_key(&self, key: &ArtifactId) {
        // Release the shard guard before invalidating: invalidation may call
        // back into watchers.
        if let Some(line) = self.get(key) {
            line.invalidate();
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn keys(&self) -> Vec<ArtifactId> {
        let mut keys: Vec<_> = self.lines.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats::default();
        for entry in self.lines.iter() {
            stats.total_entries += 1;
            if entry.value().is_invalid() {
                stats.stale_entries += 1;
            }
        }
        stats
    }
}
