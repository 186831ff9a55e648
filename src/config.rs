//! Configuration Module
//!
//! Handles loading cache, paging and server settings from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries a cache can hold
    pub cache_max_entries: usize,
    /// TTL in seconds for cached views
    pub cache_ttl_secs: u64,
    /// Approximate memory ceiling for a cache, in bytes
    pub cache_max_memory_bytes: usize,
    /// Page size used when a caller does not ask for one
    pub default_page_size: usize,
    /// Largest page size a caller may request
    pub max_page_size: usize,
    /// Number of pages warmed after a page load
    pub prefetch_pages: usize,
    /// Quiet period for search-as-you-type, in milliseconds
    pub search_debounce_ms: u64,
    /// Directory holding the JSON collection files
    pub data_dir: PathBuf,
    /// HTTP server port
    pub server_port: u16,
}

/// Settings for a single [`CacheStore`](crate::cache::CacheStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub max_entries: usize,
    pub ttl_ms: u64,
    pub max_memory_bytes: usize,
}

/// Settings for pagination in [`PagedDataAccess`](crate::access::PagedDataAccess).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageConfig {
    pub default_page_size: usize,
    pub max_page_size: usize,
    pub prefetch_pages: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `CACHE_TTL_SECS` - Cached view TTL in seconds (default: 300)
    /// - `CACHE_MAX_MEMORY_BYTES` - Approximate cache memory ceiling (default: 50 MiB)
    /// - `DEFAULT_PAGE_SIZE` - Page size when unspecified (default: 20)
    /// - `MAX_PAGE_SIZE` - Largest allowed page size (default: 100)
    /// - `PREFETCH_PAGES` - Pages warmed after a load (default: 2)
    /// - `SEARCH_DEBOUNCE_MS` - Search debounce delay (default: 300)
    /// - `DATA_DIR` - JSON collection directory (default: ./data)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_max_entries: parse_var("CACHE_MAX_ENTRIES", defaults.cache_max_entries),
            cache_ttl_secs: parse_var("CACHE_TTL_SECS", defaults.cache_ttl_secs),
            cache_max_memory_bytes: parse_var(
                "CACHE_MAX_MEMORY_BYTES",
                defaults.cache_max_memory_bytes,
            ),
            default_page_size: parse_var("DEFAULT_PAGE_SIZE", defaults.default_page_size),
            max_page_size: parse_var("MAX_PAGE_SIZE", defaults.max_page_size),
            prefetch_pages: parse_var("PREFETCH_PAGES", defaults.prefetch_pages),
            search_debounce_ms: parse_var("SEARCH_DEBOUNCE_MS", defaults.search_debounce_ms),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            server_port: parse_var("SERVER_PORT", defaults.server_port),
        }
    }

    /// Cache settings derived from this configuration.
    pub fn cache(&self) -> CacheConfig {
        CacheConfig {
            max_entries: self.cache_max_entries,
            ttl_ms: self.cache_ttl_secs.saturating_mul(1000),
            max_memory_bytes: self.cache_max_memory_bytes,
        }
    }

    /// Paging settings derived from this configuration.
    pub fn paging(&self) -> PageConfig {
        PageConfig {
            default_page_size: self.default_page_size,
            max_page_size: self.max_page_size,
            prefetch_pages: self.prefetch_pages,
        }
    }

    /// Debounce delay for search-as-you-type.
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_max_entries: 1000,
            cache_ttl_secs: 300,
            cache_max_memory_bytes: 50 * 1024 * 1024,
            default_page_size: 20,
            max_page_size: 100,
            prefetch_pages: 2,
            search_debounce_ms: 300,
            data_dir: PathBuf::from("./data"),
            server_port: 3000,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Config::default().cache()
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Config::default().paging()
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_max_entries, 1000);
        assert_eq!(config.cache_ttl_secs, 300);
        assert_eq!(config.cache_max_memory_bytes, 52_428_800);
        assert_eq!(config.default_page_size, 20);
        assert_eq!(config.max_page_size, 100);
        assert_eq!(config.prefetch_pages, 2);
        assert_eq!(config.search_debounce_ms, 300);
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_derived_settings() {
        let config = Config::default();

        let cache = config.cache();
        assert_eq!(cache.ttl_ms, 300_000);
        assert_eq!(cache.max_entries, 1000);

        let paging = config.paging();
        assert_eq!(paging.default_page_size, 20);
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        for name in [
            "CACHE_MAX_ENTRIES",
            "CACHE_TTL_SECS",
            "CACHE_MAX_MEMORY_BYTES",
            "DEFAULT_PAGE_SIZE",
            "MAX_PAGE_SIZE",
            "PREFETCH_PAGES",
            "SEARCH_DEBOUNCE_MS",
            "DATA_DIR",
            "SERVER_PORT",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env();
        assert_eq!(config.cache_max_entries, 1000);
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_parse_var_falls_back_on_garbage() {
        env::set_var("ROSTER_TEST_GARBAGE", "not-a-number");
        assert_eq!(parse_var("ROSTER_TEST_GARBAGE", 7usize), 7);
        env::remove_var("ROSTER_TEST_GARBAGE");
    }
}
