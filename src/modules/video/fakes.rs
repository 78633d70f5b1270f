//! In-memory collaborators for pipeline and handler tests.

use crate::infrastructure::encoder::{EncodeError, EncodeResult, Encoder, EncodingProfile};
use crate::infrastructure::storage::{ObjectStore, StorageError, StorageResult};
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Default)]
pub struct FakeStore {
    objects: HashSet<String>,
    fail_uploads: bool,
    downloads: AtomicUsize,
    upload_calls: AtomicUsize,
    uploaded: Mutex<Vec<String>>,
    public: Mutex<Vec<String>>,
}

impl FakeStore {
    pub fn with_object(key: &str) -> Self {
        let mut store = Self::default();
        store.objects.insert(key.to_string());
        store
    }

    pub fn failing_uploads(mut self) -> Self {
        self.fail_uploads = true;
        self
    }

    pub fn downloads(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn uploaded_keys(&self) -> Vec<String> {
        self.uploaded.lock().unwrap().clone()
    }

    pub fn public_keys(&self) -> Vec<String> {
        self.public.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn download(&self, bucket: &str, key: &str, destination: &Path) -> StorageResult<()> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        if !self.objects.contains(key) {
            return Err(StorageError::not_found(bucket, key));
        }
        tokio::fs::write(destination, b"raw video bytes").await?;
        Ok(())
    }

    async fn upload(&self, bucket: &str, source: &Path, key: &str) -> StorageResult<()> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_uploads {
            return Err(StorageError::UploadFailed("connection reset".to_string()));
        }
        if !source.is_file() {
            return Err(StorageError::UploadFailed(format!("{} missing", source.display())));
        }
        self.uploaded.lock().unwrap().push(format!("{}/{}", bucket, key));
        Ok(())
    }

    async fn make_public(&self, bucket: &str, key: &str) -> StorageResult<()> {
        self.public.lock().unwrap().push(format!("{}/{}", bucket, key));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeEncoder {
    failure: Option<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl FakeEncoder {
    pub fn succeeding() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Holds every transform open for `delay`, like a long encode.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Highest number of transforms seen running at once.
    pub fn max_concurrent(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Encoder for FakeEncoder {
    async fn transform(
        &self,
        source: &Path,
        destination: &Path,
        _profile: &EncodingProfile,
    ) -> EncodeResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let running = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(running, Ordering::SeqCst);

        let result = self.encode(source, destination).await;
        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

impl FakeEncoder {
    async fn encode(&self, source: &Path, destination: &Path) -> EncodeResult<()> {
        let input = tokio::fs::read(source).await?;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.failure {
            Some(message) => {
                // leave a truncated output behind, like an interrupted encode
                let _ = tokio::fs::write(destination, &input[..input.len() / 2]).await;
                Err(EncodeError::Failed {
                    message: message.clone(),
                    exit_code: Some(1),
                })
            }
            None => {
                tokio::fs::write(destination, &input).await?;
                Ok(())
            }
        }
    }
}
