//! Backend Module
//!
//! Persistence contract consumed by the data layer, plus two implementations:
//! an in-memory store and a directory of JSON collection files.

mod json_file;
mod memory;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

pub use json_file::JsonFileBackend;
pub use memory::MemoryBackend;

/// Whole-collection persistence.
///
/// Collections are ordered sequences of JSON records. Implementations report
/// transport failures as `BackendUnavailable` and rejected operations or
/// malformed data as `BackendError`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Returns every record of `collection`, in stored order.
    /// A collection that was never written is empty.
    async fn fetch_all(&self, collection: &str) -> Result<Vec<Value>>;

    /// Replaces the whole of `collection` with `items`.
    async fn replace_all(&self, collection: &str, items: Vec<Value>) -> Result<()>;
}
