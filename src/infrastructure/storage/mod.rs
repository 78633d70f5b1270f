//! Object storage capability used by the job pipeline.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

pub mod s3;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Failed to make object public: {0}")]
    VisibilityFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    pub fn not_found(bucket: &str, key: &str) -> Self {
        Self::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    }
}

/// Durable object store holding raw inputs and processed outputs.
///
/// `download` and `upload` are all-or-nothing: a failed call leaves no
/// partially written object or local file behind.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn download(&self, bucket: &str, key: &str, destination: &Path) -> StorageResult<()>;

    async fn upload(&self, bucket: &str, source: &Path, key: &str) -> StorageResult<()>;

    /// Marks an uploaded object publicly readable. Idempotent.
    async fn make_public(&self, bucket: &str, key: &str) -> StorageResult<()>;
}
