//! Cache Entry Module
//!
//! Defines the structure for individual cache entries and their size estimate.

use serde::Serialize;

// == Cache Entry ==
/// Represents a single cached value with its storage metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Time the value was stored (Unix milliseconds)
    pub stored_at_ms: u64,
    /// Approximate size of the value in bytes
    pub size_bytes: usize,
}

impl<V: Serialize> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry stamped at `now_ms`, sizing the value on the way in.
    pub fn new(value: V, now_ms: u64) -> Self {
        let size_bytes = approximate_size(&value);
        Self {
            value,
            stored_at_ms: now_ms,
            size_bytes,
        }
    }
}

impl<V> CacheEntry<V> {
    // == Age ==
    /// Milliseconds elapsed since the entry was stored.
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.stored_at_ms)
    }

    // == Is Expired ==
    /// Checks if the entry has outlived `ttl_ms`.
    ///
    /// An entry whose age equals the TTL is still valid; it expires once the
    /// age strictly exceeds it.
    pub fn is_expired(&self, now_ms: u64, ttl_ms: u64) -> bool {
        self.age_ms(now_ms) > ttl_ms
    }
}

// == Utility Functions ==
/// Estimates the in-memory footprint of a value.
///
/// Two bytes per character of its JSON form. Values that fail to serialize
/// count as zero.
pub fn approximate_size<V: Serialize + ?Sized>(value: &V) -> usize {
    serde_json::to_string(value)
        .map(|json| json.len() * 2)
        .unwrap_or(0)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("abc".to_string(), 1_000);

        assert_eq!(entry.value, "abc");
        assert_eq!(entry.stored_at_ms, 1_000);
        // "\"abc\"" is 5 chars
        assert_eq!(entry.size_bytes, 10);
    }

    #[test]
    fn test_entry_not_expired_within_ttl() {
        let entry = CacheEntry::new(1u32, 1_000);

        assert!(!entry.is_expired(1_500, 1_000));
        assert_eq!(entry.age_ms(1_500), 500);
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new(1u32, 1_000);

        assert!(!entry.is_expired(2_000, 1_000), "age == ttl is still valid");
        assert!(entry.is_expired(2_001, 1_000));
    }

    #[test]
    fn test_age_never_negative() {
        let entry = CacheEntry::new(1u32, 5_000);
        assert_eq!(entry.age_ms(4_000), 0);
    }

    #[test]
    fn test_approximate_size_of_collections() {
        let items = vec!["a".to_string(), "b".to_string()];
        // ["a","b"] is 9 chars
        assert_eq!(approximate_size(&items), 18);
    }
}
