use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::Backend;
use crate::error::{DataError, Result};

/// In-process backend.
///
/// Can be switched offline or made to reject writes, which is how tests
/// exercise the failure paths of the layers above.
#[derive(Debug)]
pub struct MemoryBackend {
    collections: RwLock<HashMap<String, Vec<Value>>>,
    available: AtomicBool,
    reject_writes: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
            reject_writes: AtomicBool::new(false),
        }
    }

    /// Creates a backend pre-populated with one collection.
    pub fn with_collection(collection: &str, items: Vec<Value>) -> Self {
        let mut collections = HashMap::new();
        collections.insert(collection.to_string(), items);
        Self {
            collections: RwLock::new(collections),
            ..Self::new()
        }
    }

    /// Simulates going offline (`false`) or coming back (`true`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Makes every subsequent `replace_all` fail with `BackendError`.
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DataError::BackendUnavailable(
                "memory backend is offline".to_string(),
            ))
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn fetch_all(&self, collection: &str) -> Result<Vec<Value>> {
        self.ensure_available()?;
        let collections = self.collections.read().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn replace_all(&self, collection: &str, items: Vec<Value>) -> Result<()> {
        self.ensure_available()?;
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(DataError::BackendError(format!(
                "write to {} rejected",
                collection
            )));
        }
        self.collections
            .write()
            .await
            .insert(collection.to_string(), items);
        Ok(())
    }
}
