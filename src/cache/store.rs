//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with age tracking, lazy TTL
//! expiry and a memory ceiling.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::cache::{AgeTracker, CacheEntry, CacheStats, Clock, SystemClock};
use crate::config::CacheConfig;

// == Cache Store ==
/// Bounded TTL cache.
///
/// Expired entries are dropped when touched by `get` or swept by `set` when
/// the memory ceiling is reached; nothing runs in the background.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Storage order, oldest first
    order: AgeTracker,
    /// Performance counters
    stats: CacheStats,
    /// Running sum of entry sizes
    memory_usage: usize,
    config: CacheConfig,
    clock: Arc<dyn Clock>,
}

impl<V: Clone + Serialize> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore using wall-clock time.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a new CacheStore reading time from `clock`.
    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            order: AgeTracker::new(),
            stats: CacheStats::new(),
            memory_usage: 0,
            config,
            clock,
        }
    }

    // == Get ==
    /// Returns a clone of the value stored under `key`, if still fresh.
    ///
    /// An expired entry is removed as a side effect and counts as a miss.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = self.clock.now_ms();
        let expired = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired(now, self.config.ttl_ms),
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_miss();
            return None;
        }

        self.stats.record_hit();
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// When the memory ceiling would be crossed, expired entries are swept
    /// first. At the entry-count ceiling the oldest entry is evicted, and
    /// further oldest entries go while the new value still does not fit under
    /// the memory ceiling. A value larger than the whole ceiling is still
    /// stored, alone.
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        if self.config.max_entries == 0 {
            return;
        }

        let entry = CacheEntry::new(value, self.clock.now_ms());
        let size = entry.size_bytes;

        self.remove_entry(&key);

        if self.memory_usage + size > self.config.max_memory_bytes {
            let swept = self.cleanup_expired();
            if swept > 0 {
                debug!("Cache sweep removed {} expired entries", swept);
            }
        }

        if self.entries.len() >= self.config.max_entries {
            self.evict_oldest();
        }

        while self.memory_usage + size > self.config.max_memory_bytes && self.evict_oldest() {}

        self.memory_usage += size;
        self.order.stored(&key);
        self.entries.insert(key, entry);
    }

    // == Invalidate ==
    /// Removes every entry whose key contains `pattern`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate(&mut self, pattern: &str) -> usize {
        let matching: Vec<String> = self
            .entries
            .keys()
            .filter(|key| key.contains(pattern))
            .cloned()
            .collect();

        for key in &matching {
            self.remove_entry(key);
        }
        matching.len()
    }

    // == Clear ==
    /// Drops all entries and resets memory usage.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.memory_usage = 0;
    }

    // == Stats ==
    /// Returns current occupancy and counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            memory_usage: self.memory_usage,
            ..self.stats.clone()
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let ttl = self.config.ttl_ms;
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now, ttl))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
        }
        expired_keys.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn memory_usage(&self) -> usize {
        self.memory_usage
    }

    // == Internals ==
    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let entry = self.entries.remove(key)?;
        self.memory_usage -= entry.size_bytes;
        self.order.remove(key);
        Some(entry)
    }

    fn evict_oldest(&mut self) -> bool {
        let Some(oldest) = self.order.pop_oldest() else {
            return false;
        };
        if let Some(entry) = self.entries.remove(&oldest) {
            self.memory_usage -= entry.size_bytes;
            self.stats.record_eviction();
            debug!("Evicted cache entry {}", oldest);
        }
        true
    }
}
