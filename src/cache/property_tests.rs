//! Property-Based Tests for Cache Module
//!
//! Uses proptest to verify the size, expiry and invalidation guarantees of
//! the cache store.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{approximate_size, CacheStore, ManualClock};
use crate::config::CacheConfig;

// == Test Configuration ==
const TEST_TTL_MS: u64 = 300_000;

fn store(max_entries: usize, max_memory_bytes: usize) -> (CacheStore<String>, ManualClock) {
    let clock = ManualClock::new(1_700_000_000_000);
    let config = CacheConfig {
        max_entries,
        ttl_ms: TEST_TTL_MS,
        max_memory_bytes,
    };
    (CacheStore::with_clock(config, Arc::new(clock.clone())), clock)
}

// == Strategies ==
/// Generates cache keys shaped like the data layer's view keys
fn key_strategy() -> impl Strategy<Value = String> {
    ("[a-z]{1,8}", "(all|page|search)", "[a-z0-9]{0,6}")
        .prop_map(|(collection, kind, rest)| format!("{}:{}:{}", collection, kind, rest))
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,300}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // After any sequence of sets, memory usage exceeds the ceiling by at most
    // the size of the most recently inserted entry.
    #[test]
    fn prop_memory_ceiling_respected(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..80),
        ceiling in 200usize..4_000
    ) {
        let (mut store, _) = store(1_000, ceiling);

        for (key, value) in entries {
            let size = approximate_size(&value);
            store.set(key, value);
            let usage = store.stats().memory_usage;
            prop_assert!(
                usage <= ceiling || usage <= size,
                "usage {} over ceiling {} with last entry of {}",
                usage,
                ceiling,
                size
            );
        }
    }

    // Entry count never exceeds the configured maximum.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..200)
    ) {
        let max_entries = 20;
        let (mut store, _) = store(max_entries, usize::MAX / 4);

        for (key, value) in entries {
            store.set(key, value);
            prop_assert!(store.len() <= max_entries);
        }
    }

    // A set immediately followed by a get returns the exact value.
    #[test]
    fn prop_roundtrip_before_ttl(key in key_strategy(), value in value_strategy()) {
        let (mut store, _) = store(100, 1_000_000);

        store.set(key.clone(), value.clone());

        prop_assert_eq!(store.get(&key), Some(value));
    }

    // Once the TTL has elapsed, get returns absent and the entry is gone
    // from the stats.
    #[test]
    fn prop_ttl_expiration(
        key in key_strategy(),
        value in value_strategy(),
        overshoot in 1u64..10_000
    ) {
        let (mut store, clock) = store(100, 1_000_000);

        store.set(key.clone(), value);
        clock.advance(Duration::from_millis(TEST_TTL_MS + overshoot));

        prop_assert_eq!(store.get(&key), None);
        prop_assert_eq!(store.stats().size, 0);
        prop_assert_eq!(store.stats().memory_usage, 0);
    }

    // invalidate removes all and only the keys containing the pattern.
    #[test]
    fn prop_invalidate_exact(
        keys in prop::collection::hash_set(key_strategy(), 1..40),
        pattern in "[a-z]{1,3}"
    ) {
        let (mut store, _) = store(1_000, usize::MAX / 4);
        for key in &keys {
            store.set(key.clone(), "v".to_string());
        }

        store.invalidate(&pattern);

        let expected: HashSet<&String> = keys.iter().filter(|k| !k.contains(&pattern)).collect();
        prop_assert_eq!(store.len(), expected.len());
        for key in &keys {
            let present = store.get(key).is_some();
            prop_assert_eq!(present, !key.contains(&pattern), "key {}", key);
        }
    }

    // Tracked memory always equals the sum of the live entries' sizes.
    #[test]
    fn prop_memory_accounting_consistent(
        ops in prop::collection::vec((key_strategy(), value_strategy(), any::<bool>()), 1..60)
    ) {
        let (mut store, _) = store(15, 2_000);
        let mut seen: HashSet<String> = HashSet::new();

        for (key, value, invalidate) in ops {
            if invalidate {
                store.invalidate(&key);
            } else {
                seen.insert(key.clone());
                store.set(key, value);
            }
        }

        let live_size: usize = seen
            .iter()
            .filter_map(|key| store.get(key))
            .map(|value| approximate_size(&value))
            .sum();
        prop_assert_eq!(store.memory_usage(), live_size);
    }
}

// == Example Scenarios ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_400_byte_entries_under_1000_ceiling() {
        let (mut store, clock) = store(100, 1_000);
        let value = "x".repeat(198);
        assert_eq!(approximate_size(&value), 400);

        store.set("first", value.clone());
        clock.advance(Duration::from_millis(1));
        store.set("second", value.clone());
        clock.advance(Duration::from_millis(1));
        store.set("third", value);

        let stats = store.stats();
        assert!(stats.size <= 2);
        assert!(stats.memory_usage <= 1_000);
        assert_eq!(store.get("first"), None);
    }
}
