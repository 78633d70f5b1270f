use super::{EncodeError, EncodeResult, Encoder, EncodingProfile};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, error, info};

#[derive(Clone, Debug)]
pub struct FfmpegEncoder {
    binary: String,
}

impl FfmpegEncoder {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn build_args(source: &Path, destination: &Path, profile: &EncodingProfile) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-v".to_string(),
            "error".to_string(),
            "-i".to_string(),
            source.to_string_lossy().to_string(),
            "-vf".to_string(),
            profile.video_filter(),
            destination.to_string_lossy().to_string(),
        ]
    }
}

#[async_trait]
impl Encoder for FfmpegEncoder {
    async fn transform(
        &self,
        source: &Path,
        destination: &Path,
        profile: &EncodingProfile,
    ) -> EncodeResult<()> {
        let args = Self::build_args(source, destination, profile);
        debug!("Running {} {}", self.binary, args.join(" "));

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => EncodeError::NotFound(self.binary.clone()),
                _ => EncodeError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!("🎞️ ffmpeg failed on {}: {}", source.display(), stderr);
            return Err(EncodeError::Failed {
                message: if stderr.is_empty() {
                    "ffmpeg exited unsuccessfully".to_string()
                } else {
                    stderr
                },
                exit_code: output.status.code(),
            });
        }

        info!("🎞️ Video processed successfully: {}", destination.display());
        Ok(())
    }
}
