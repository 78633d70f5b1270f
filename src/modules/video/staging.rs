//! Local scratch directories for raw downloads and encoder output.
//!
//! Every staged file is addressed by a path derived only from the object
//! key, so any step can re-derive what needs cleaning up after a failure.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::fs;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

pub const PROCESSED_PREFIX: &str = "processed-";

pub fn processed_key_for(object_key: &str) -> String {
    format!("{}{}", PROCESSED_PREFIX, object_key)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StagingPaths {
    pub raw_path: PathBuf,
    pub processed_key: String,
    pub processed_path: PathBuf,
}

/// A delete that could not be completed. Logged, never escalated.
#[derive(Debug, Error)]
#[error("Failed to delete {}: {source}", path.display())]
pub struct CleanupWarning {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

#[derive(Debug)]
pub enum Cleanup {
    Removed,
    Absent,
    Failed(CleanupWarning),
}

impl Cleanup {
    pub fn is_clean(&self) -> bool {
        !matches!(self, Cleanup::Failed(_))
    }
}

#[derive(Clone, Debug)]
pub struct LocalStagingArea {
    raw_dir: PathBuf,
    processed_dir: PathBuf,
}

impl LocalStagingArea {
    pub fn new(raw_dir: impl Into<PathBuf>, processed_dir: impl Into<PathBuf>) -> Self {
        Self {
            raw_dir: raw_dir.into(),
            processed_dir: processed_dir.into(),
        }
    }

    pub fn raw_dir(&self) -> &Path {
        &self.raw_dir
    }

    pub fn processed_dir(&self) -> &Path {
        &self.processed_dir
    }

    /// Creates both directories and their parents. Called once at startup.
    pub async fn ensure_directories(&self) -> std::io::Result<()> {
        for dir in [&self.raw_dir, &self.processed_dir] {
            if fs::try_exists(dir).await.unwrap_or(false) {
                continue;
            }
            fs::create_dir_all(dir).await?;
            info!("📁 Directory created at {}", dir.display());
        }
        Ok(())
    }

    pub fn raw_path_for(&self, object_key: &str) -> PathBuf {
        self.raw_dir.join(object_key)
    }

    pub fn processed_path_for(&self, processed_key: &str) -> PathBuf {
        self.processed_dir.join(processed_key)
    }

    pub fn paths_for(&self, object_key: &str) -> StagingPaths {
        let processed_key = processed_key_for(object_key);
        StagingPaths {
            raw_path: self.raw_path_for(object_key),
            processed_path: self.processed_path_for(&processed_key),
            processed_key,
        }
    }

    /// Best-effort removal. A missing file is a no-op; any other failure is
    /// logged and handed back as a warning instead of an error.
    pub async fn delete(&self, path: &Path) -> Cleanup {
        match fs::remove_file(path).await {
            Ok(()) => {
                info!("🧹 File deleted at {}", path.display());
                Cleanup::Removed
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("File not found at {}, skipping delete", path.display());
                Cleanup::Absent
            }
            Err(e) => {
                let warning = CleanupWarning {
                    path: path.to_path_buf(),
                    source: e,
                };
                warn!("⚠️ {}", warning);
                Cleanup::Failed(warning)
            }
        }
    }

    /// Deletes both staged files of a job concurrently.
    pub async fn reclaim(&self, paths: &StagingPaths) -> (Cleanup, Cleanup) {
        tokio::join!(self.delete(&paths.raw_path), self.delete(&paths.processed_path))
    }
}

/// Serializes runs that share an object key, since they share staging files.
#[derive(Debug, Default)]
pub struct KeyLocks {
    inner: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

pub struct KeyGuard<'a> {
    locks: &'a KeyLocks,
    key: String,
    _guard: OwnedMutexGuard<()>,
}

impl KeyLocks {
    pub async fn acquire(&self, key: &str) -> KeyGuard<'_> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            map.entry(key.to_string()).or_default().clone()
        };

        if lock.try_lock().is_err() {
            info!("⏳ Another job is staging {}, waiting", key);
        }

        KeyGuard {
            locks: self,
            key: key.to_string(),
            _guard: lock.lock_owned().await,
        }
    }

    #[cfg(test)]
    pub fn in_flight(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        let mut map = self.locks.inner.lock().unwrap_or_else(|e| e.into_inner());
        // Only the map and this guard hold the lock: nobody is waiting.
        if map.get(&self.key).is_some_and(|lock| Arc::strong_count(lock) == 2) {
            map.remove(&self.key);
        }
    }
}
