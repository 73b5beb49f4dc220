//! Object storage interface for RAS model file sets (MinIO/S3 compatible).

use bytes::Bytes;
use object_store::{
    aws::AmazonS3Builder, local::LocalFileSystem, memory::InMemory, path::Path, ObjectStore,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

use ras_common::{path as keypath, RasError, RasResult};

/// Configuration for an S3-compatible object storage connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectStorageConfig {
    /// S3/MinIO endpoint URL
    pub endpoint: String,
    /// Bucket name
    pub bucket: String,
    /// Access key ID
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// AWS region (use "us-east-1" for MinIO)
    pub region: String,
    /// Allow HTTP (for local MinIO)
    pub allow_http: bool,
}

/// A single entry from a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Full object key
    pub path: String,
    /// Base name of the object
    pub name: String,
}

/// Read-mostly store client for model file sets.
///
/// The extraction core only reads; `put` exists for fixture loading and
/// ingest tooling.
#[derive(Clone)]
pub struct ModelStore {
    store: Arc<dyn ObjectStore>,
    label: String,
}

impl std::fmt::Debug for ModelStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelStore").field("label", &self.label).finish()
    }
}

impl ModelStore {
    /// Create a store client backed by S3-compatible object storage.
    pub fn s3(config: &ObjectStorageConfig) -> RasResult<Self> {
        let mut builder = AmazonS3Builder::new()
            .with_endpoint(&config.endpoint)
            .with_bucket_name(&config.bucket)
            .with_access_key_id(&config.access_key_id)
            .with_secret_access_key(&config.secret_access_key)
            .with_region(&config.region);

        if config.allow_http {
            builder = builder.with_allow_http(true);
        }

        let store = builder
            .build()
            .map_err(|e| RasError::storage(format!("failed to create S3 client: {}", e)))?;

        Ok(Self {
            store: Arc::new(store),
            label: format!("s3://{}", config.bucket),
        })
    }

    /// Create a store client backed by a local directory.
    pub fn local(root: &str) -> RasResult<Self> {
        let store = LocalFileSystem::new_with_prefix(root)
            .map_err(|e| RasError::storage(format!("failed to open {}: {}", root, e)))?;

        Ok(Self {
            store: Arc::new(store),
            label: format!("file://{}", root),
        })
    }

    /// Create an in-memory store client (tests and fixtures).
    pub fn memory() -> Self {
        Self {
            store: Arc::new(InMemory::new()),
            label: "memory://".to_string(),
        }
    }

    /// Read an object in full.
    #[instrument(skip(self), fields(store = %self.label, key = %key))]
    pub async fn get(&self, key: &str) -> RasResult<Bytes> {
        let location = Path::from(key);

        let result = self
            .store
            .get(&location)
            .await
            .map_err(|e| RasError::storage(format!("failed to read {}: {}", key, e)))?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| RasError::storage(format!("failed to read bytes of {}: {}", key, e)))?;

        debug!(size = bytes.len(), "Read object");
        Ok(bytes)
    }

    /// Read an object and decode it as text. Invalid UTF-8 is replaced; the
    /// file formats served here are ASCII in practice.
    pub async fn get_text(&self, key: &str) -> RasResult<String> {
        let bytes = self.get(key).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Read the first textual line of an object, without the line terminator.
    pub async fn first_line(&self, key: &str) -> RasResult<String> {
        let text = self.get_text(key).await?;
        let line = text.lines().next().unwrap_or("");
        Ok(line.trim_end_matches('\r').to_string())
    }

    /// List the immediate children of a directory prefix (non-recursive).
    #[instrument(skip(self), fields(store = %self.label, prefix = %prefix))]
    pub async fn list_dir(&self, prefix: &str) -> RasResult<Vec<DirEntry>> {
        let prefix_path = Path::from(prefix);

        let listing = self
            .store
            .list_with_delimiter(Some(&prefix_path))
            .await
            .map_err(|e| RasError::storage(format!("list {} failed: {}", prefix, e)))?;

        let mut entries: Vec<DirEntry> = listing
            .objects
            .into_iter()
            .map(|meta| {
                let path = meta.location.to_string();
                let name = keypath::base_name(&path).to_string();
                DirEntry { path, name }
            })
            .collect();

        entries.sort_by(|a, b| a.path.cmp(&b.path));
        debug!(count = entries.len(), "Listed directory");
        Ok(entries)
    }

    /// Write bytes to a key. Used by fixtures and ingest tooling only.
    #[instrument(skip(self, data), fields(store = %self.label, key = %key))]
    pub async fn put(&self, key: &str, data: Bytes) -> RasResult<()> {
        let location = Path::from(key);

        self.store
            .put(&location, data.into())
            .await
            .map_err(|e| RasError::storage(format!("failed to write {}: {}", key, e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_roundtrip() {
        let store = ModelStore::memory();
        store
            .put(
                "models/case/case.prj",
                Bytes::from_static(b"Proj Title=Test\r\nUnits=..."),
            )
            .await
            .unwrap();

        let first = store.first_line("models/case/case.prj").await.unwrap();
        assert_eq!(first, "Proj Title=Test");
    }

    #[tokio::test]
    async fn test_list_dir_is_not_recursive() {
        let store = ModelStore::memory();
        store.put("models/case/case.prj", Bytes::from_static(b"x")).await.unwrap();
        store.put("models/case/case.g01", Bytes::from_static(b"x")).await.unwrap();
        store.put("models/case/sub/other.g01", Bytes::from_static(b"x")).await.unwrap();

        let entries = store.list_dir("models/case").await.unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["case.g01", "case.prj"]);
    }

    #[tokio::test]
    async fn test_get_missing_is_storage_error() {
        let store = ModelStore::memory();
        let err = store.get("absent").await.unwrap_err();
        assert_eq!(err.http_status_code(), 500);
    }

    #[tokio::test]
    async fn test_local_store() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("models/case");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("case.prj"), "Proj Title=Local\n").unwrap();

        let store = ModelStore::local(dir.path().to_str().unwrap()).unwrap();
        let entries = store.list_dir("models/case").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "case.prj");
        assert_eq!(
            store.first_line("models/case/case.prj").await.unwrap(),
            "Proj Title=Local"
        );
    }
}
