//! Encoding capability used by the job pipeline.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

pub mod ffmpeg;

pub type EncodeResult<T> = Result<T, EncodeError>;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Encoder binary not found: {0}")]
    NotFound(String),

    #[error("Encoding failed (exit code {exit_code:?}): {message}")]
    Failed {
        message: String,
        exit_code: Option<i32>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Transform parameters applied to every job handled by this worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodingProfile {
    /// ffmpeg `scale` filter argument, `-1:360` keeps the aspect ratio at 360p.
    pub scale: String,
}

impl EncodingProfile {
    pub fn new(scale: impl Into<String>) -> Self {
        Self { scale: scale.into() }
    }

    pub fn video_filter(&self) -> String {
        format!("scale={}", self.scale)
    }
}

impl Default for EncodingProfile {
    fn default() -> Self {
        Self::new("-1:360")
    }
}

/// Re-encodes a local file into another local file.
///
/// Completes exactly once, after the encoder has finished writing
/// `destination` or has given up.
#[async_trait]
pub trait Encoder: Send + Sync {
    async fn transform(
        &self,
        source: &Path,
        destination: &Path,
        profile: &EncodingProfile,
    ) -> EncodeResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_targets_360p() {
        let profile = EncodingProfile::default();
        assert_eq!(profile.scale, "-1:360");
        assert_eq!(profile.video_filter(), "scale=-1:360");
    }
}
