//! Cache Statistics Module
//!
//! Tracks cache size, approximate memory usage and hit/miss/eviction counters.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache occupancy and performance counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Current number of entries
    pub size: usize,
    /// Sum of approximate entry sizes, in bytes
    pub memory_usage: usize,
    /// Number of reads served from the cache
    pub hits: u64,
    /// Number of reads that found nothing fresh
    pub misses: u64,
    /// Number of entries evicted to make room
    pub evictions: u64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }
}
