//! Age Tracker Module
//!
//! Keeps cache keys in the order they were stored, for oldest-first eviction.

use std::collections::VecDeque;

// == Age Tracker ==
/// Tracks storage order of cache keys.
///
/// Keys are stored in a VecDeque where:
/// - Front = Oldest stored
/// - Back = Most recently stored
///
/// Reads do not reorder keys; only a fresh store does.
#[derive(Debug, Default)]
pub struct AgeTracker {
    order: VecDeque<String>,
}

impl AgeTracker {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Stored ==
    /// Records that `key` was (re)stored just now, making it the newest.
    pub fn stored(&mut self, key: &str) {
        self.remove(key);
        self.order.push_back(key.to_string());
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    // == Pop Oldest ==
    /// Returns and removes the oldest stored key.
    pub fn pop_oldest(&mut self) -> Option<String> {
        self.order.pop_front()
    }

    /// Returns the oldest stored key without removing it.
    #[cfg(test)]
    pub fn peek_oldest(&self) -> Option<&String> {
        self.order.front()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[cfg(test)]
    pub fn contains(&self, key: &str) -> bool {
        self.order.iter().any(|k| k == key)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_new() {
        let tracker = AgeTracker::new();
        assert!(tracker.is_empty());
        assert_eq!(tracker.peek_oldest(), None);
    }

    #[test]
    fn test_pop_oldest_follows_store_order() {
        let mut tracker = AgeTracker::new();
        tracker.stored("users:all");
        tracker.stored("users:page:0:10");
        tracker.stored("events:all");

        assert_eq!(tracker.pop_oldest(), Some("users:all".to_string()));
        assert_eq!(tracker.pop_oldest(), Some("users:page:0:10".to_string()));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_restore_moves_key_to_back() {
        let mut tracker = AgeTracker::new();
        tracker.stored("a");
        tracker.stored("b");
        tracker.stored("a");

        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.peek_oldest(), Some(&"b".to_string()));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut tracker = AgeTracker::new();
        tracker.stored("a");
        tracker.stored("b");

        tracker.remove("a");
        tracker.remove("missing");
        assert!(!tracker.contains("a"));
        assert!(tracker.contains("b"));

        tracker.clear();
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_pop_empty() {
        let mut tracker = AgeTracker::new();
        assert_eq!(tracker.pop_oldest(), None);
    }
}
