use super::{ObjectStore, StorageError, StorageResult};
use async_trait::async_trait;
use aws_sdk_s3::config::Builder;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::{Client, config::BehaviorVersion, config::Credentials, config::Region};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct StorageService {
    pub client: Client,
}

impl StorageService {
    pub fn new(endpoint: &str, region: &str, access_key: &str, secret_key: &str) -> Self {
        let credentials = Credentials::new(access_key, secret_key, None, None, "static");

        let config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .endpoint_url(endpoint)
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        let client = Client::from_conf(config);

        info!("✅ Object storage client ready ({})", endpoint);

        Self { client }
    }

    async fn stream_to_file(&self, bucket: &str, key: &str, part: &Path) -> StorageResult<()> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| match e.as_service_error() {
                Some(err) if err.is_no_such_key() => StorageError::not_found(bucket, key),
                _ => StorageError::DownloadFailed(DisplayErrorContext(&e).to_string()),
            })?;

        let mut body = response.body;
        let mut file = fs::File::create(part).await?;
        let mut written: u64 = 0;

        while let Some(chunk) = body
            .try_next()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?
        {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        file.flush().await?;
        file.sync_all().await?;
        debug!("Received {} bytes for {}/{}", written, bucket, key);
        Ok(())
    }
}

/// Sibling file the download is streamed into before being renamed into place.
/// The leading dot and per-call uuid keep it apart from every other job's
/// staged files, including a raw file literally named `<key>.part`.
fn part_path(destination: &Path) -> PathBuf {
    let mut name = std::ffi::OsString::from(".");
    name.push(destination.file_name().unwrap_or_default());
    name.push(format!(".{}.part", Uuid::new_v4().simple()));
    destination.with_file_name(name)
}

/// Removes an abandoned `.part` file. Returns whether it is gone.
async fn discard_part(part: &Path) -> bool {
    match fs::remove_file(part).await {
        Ok(()) => true,
        Err(e) if e.kind() == ErrorKind::NotFound => true,
        Err(e) => {
            warn!("⚠️ Failed to delete partial download {}: {}", part.display(), e);
            false
        }
    }
}

#[async_trait]
impl ObjectStore for StorageService {
    async fn download(&self, bucket: &str, key: &str, destination: &Path) -> StorageResult<()> {
        debug!("⬇️ Downloading s3://{}/{} to {}", bucket, key, destination.display());

        let part = part_path(destination);
        if let Err(e) = self.stream_to_file(bucket, key, &part).await {
            discard_part(&part).await;
            return Err(e);
        }

        if let Err(e) = fs::rename(&part, destination).await {
            discard_part(&part).await;
            return Err(e.into());
        }

        info!("⬇️ s3://{}/{} downloaded to {}", bucket, key, destination.display());
        Ok(())
    }

    async fn upload(&self, bucket: &str, source: &Path, key: &str) -> StorageResult<()> {
        debug!("⬆️ Uploading {} to s3://{}/{}", source.display(), bucket, key);

        let body = ByteStream::from_path(source)
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        let content_type = mime_guess::from_path(source).first_or_octet_stream();

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .content_type(content_type.essence_str())
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(DisplayErrorContext(&e).to_string()))?;

        info!("⬆️ {} uploaded to s3://{}/{}", source.display(), bucket, key);
        Ok(())
    }

    async fn make_public(&self, bucket: &str, key: &str) -> StorageResult<()> {
        self.client
            .put_object_acl()
            .bucket(bucket)
            .key(key)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| StorageError::VisibilityFailed(DisplayErrorContext(&e).to_string()))?;

        info!("🌐 s3://{}/{} is now public", bucket, key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn part_path_is_a_hidden_sibling_of_the_destination() {
        let part = part_path(Path::new("/tmp/raw-videos/clip1.mp4"));
        let name = part.file_name().unwrap().to_string_lossy().to_string();

        assert_eq!(part.parent(), Some(Path::new("/tmp/raw-videos")));
        assert!(name.starts_with(".clip1.mp4."), "got {}", name);
        assert!(name.ends_with(".part"), "got {}", name);
    }

    #[test]
    fn part_path_never_matches_another_keys_raw_file() {
        let destination = Path::new("/tmp/raw-videos/clip.mp4");
        let first = part_path(destination);

        assert_ne!(first, PathBuf::from("/tmp/raw-videos/clip.mp4.part"));
        assert_ne!(first, part_path(destination));
    }

    #[tokio::test]
    async fn discard_part_removes_leftovers_and_reports_failures() {
        let dir = TempDir::new().unwrap();
        let part = dir.path().join(".clip1.mp4.0.part");
        fs::write(&part, b"partial").await.unwrap();

        assert!(discard_part(&part).await);
        assert!(!part.exists());
        assert!(discard_part(&part).await);

        // remove_file refuses directories
        let stuck = dir.path().join(".clip2.mp4.0.part");
        fs::create_dir(&stuck).await.unwrap();
        assert!(!discard_part(&stuck).await);
    }
}
