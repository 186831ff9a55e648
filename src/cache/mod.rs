//! Cache Module
//!
//! Provides a bounded in-memory cache with lazy TTL expiry, approximate
//! byte accounting and oldest-first eviction.

mod clock;
mod entry;
mod order;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{approximate_size, CacheEntry};
pub use order::AgeTracker;
pub use stats::CacheStats;
pub use store::CacheStore;
