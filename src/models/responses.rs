//! Response DTOs for the portal API

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Cache counters of one collection, with the derived hit rate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStats {
    #[serde(flatten)]
    pub cache: CacheStats,
    pub hit_rate: f64,
    pub pending_writes: usize,
}

impl CollectionStats {
    pub fn new(cache: CacheStats, pending_writes: usize) -> Self {
        Self {
            hit_rate: cache.hit_rate(),
            cache,
            pending_writes,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub volunteers: CollectionStats,
    pub events: CollectionStats,
    pub suggestions: CollectionStats,
}

/// Response body for the save endpoints (PUT /{collection})
#[derive(Debug, Clone, Serialize)]
pub struct SaveResponse {
    pub message: String,
    pub id: String,
}

impl SaveResponse {
    pub fn new(collection: &str, id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            message: format!("Saved {} record '{}'", collection, id),
            id,
        }
    }
}
