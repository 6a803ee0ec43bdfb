mod local;
mod naming;

pub use local::LocalStore;
pub use naming::{blob_name, file_url, key_from_file_url, UPLOADS_URL_PREFIX};

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("invalid key: {0:?}")]
    InvalidKey(String),

    #[error("store error: {0}")]
    Internal(String),
}

/// A flat store for opaque blobs addressed by generated names.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Create a new object and flush it to disk. Never overwrites: an
    /// existing key yields `StoreError::AlreadyExists`.
    async fn put(&self, key: &str, data: Bytes) -> Result<(), StoreError>;

    /// Read an object. Returns `StoreError::NotFound` if absent.
    async fn get(&self, key: &str) -> Result<Bytes, StoreError>;

    /// Delete an object. Returns `StoreError::NotFound` if absent so callers
    /// can decide whether a missing blob matters.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Check if an object exists.
    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        match self.get(key).await {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Configuration for the blob area.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding uploaded files. Served read-only under `/uploads/`.
    pub uploads_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uploads_dir: PathBuf::from("uploads"),
        }
    }
}

/// Create the blob store, making sure its directory exists.
pub fn create_store(config: &StoreConfig) -> Result<Arc<dyn ObjectStore>, StoreError> {
    std::fs::create_dir_all(&config.uploads_dir).map_err(|e| {
        StoreError::Internal(format!("mkdir {}: {e}", config.uploads_dir.display()))
    })?;
    Ok(Arc::new(LocalStore::new(config)))
}
