/// Snapshot of the module name cache
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of roots with a cache line
    pub total_entries: usize,
    /// Lines flagged invalid but not yet recomputed
    pub stale_entries: usize,
}

impl CacheStats {
    pub fn live_entries(&self) -> usize {
        self.total_entries - self.stale_entries
    }
}
