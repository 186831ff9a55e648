use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tracing::debug;

use super::Backend;
use crate::error::{DataError, Result};

/// Stores each collection as a JSON array in `<dir>/<collection>.json`.
///
/// This plays the part of the browser's local storage in the portal: a
/// simple key-per-collection store holding the full serialized list.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    dir: PathBuf,
}

impl JsonFileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn collection_path(&self, collection: &str) -> Result<PathBuf> {
        let valid = !collection.is_empty()
            && collection
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(DataError::BackendError(format!(
                "invalid collection name: {:?}",
                collection
            )));
        }
        Ok(self.dir.join(format!("{}.json", collection)))
    }
}

#[async_trait]
impl Backend for JsonFileBackend {
    async fn fetch_all(&self, collection: &str) -> Result<Vec<Value>> {
        let path = self.collection_path(collection)?;
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(DataError::BackendUnavailable(format!(
                    "reading {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Array(items)) => Ok(items),
            Ok(_) => Err(DataError::BackendError(format!(
                "{} does not hold a JSON array",
                path.display()
            ))),
            Err(e) => Err(DataError::BackendError(format!(
                "parsing {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn replace_all(&self, collection: &str, items: Vec<Value>) -> Result<()> {
        let path = self.collection_path(collection)?;
        let body = serde_json::to_vec(&items)
            .map_err(|e| DataError::BackendError(format!("encoding {}: {}", collection, e)))?;

        let unavailable = |e: std::io::Error| {
            DataError::BackendUnavailable(format!("writing {}: {}", path.display(), e))
        };

        fs::create_dir_all(&self.dir).await.map_err(unavailable)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &body).await.map_err(unavailable)?;
        fs::rename(&tmp, &path).await.map_err(unavailable)?;

        debug!("Wrote {} records to {}", items.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_file_is_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path());

        assert!(backend.fetch_all("volunteers").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replace_then_fetch_roundtrips_order() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("nested"));
        let items = vec![json!({"id": "b"}), json!({"id": "a"})];

        backend.replace_all("volunteers", items.clone()).await.unwrap();

        assert_eq!(backend.fetch_all("volunteers").await.unwrap(), items);
        assert!(dir.path().join("nested/volunteers.json").exists());
        assert!(!dir.path().join("nested/volunteers.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_backend_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("events.json"), b"{not json").unwrap();
        std::fs::write(dir.path().join("suggestions.json"), b"{\"id\":1}").unwrap();
        let backend = JsonFileBackend::new(dir.path());

        assert!(matches!(
            backend.fetch_all("events").await,
            Err(DataError::BackendError(_))
        ));
        assert!(matches!(
            backend.fetch_all("suggestions").await,
            Err(DataError::BackendError(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_path_like_collection_names() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path());

        let result = backend.replace_all("../escape", vec![]).await;
        assert!(matches!(result, Err(DataError::BackendError(_))));
    }
}
