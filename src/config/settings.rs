use serde::Deserialize;
use std::path::PathBuf;
use crate::config::env::{self, EnvKey};

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server_port: u16,
    pub storage_endpoint: String,
    pub storage_region: String,
    pub storage_access_key: String,
    pub storage_secret_key: String,
    pub raw_bucket: String,
    pub processed_bucket: String,
    pub raw_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub video_scale: String,
    pub ffmpeg_path: String,
    pub amqp_url: Option<String>,
    pub video_queue: String,
}

impl AppConfig {
    pub fn new() -> Result<Self, std::env::VarError> {
        Ok(Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 3000),
            storage_endpoint: env::get(EnvKey::StorageEndpoint)?,
            storage_region: env::get_or(EnvKey::StorageRegion, "us-east-1"),
            storage_access_key: env::get(EnvKey::StorageAccessKey)?,
            storage_secret_key: env::get(EnvKey::StorageSecretKey)?,
            raw_bucket: env::get_or(EnvKey::RawBucket, "raw-videos"),
            processed_bucket: env::get_or(EnvKey::ProcessedBucket, "processed-videos"),
            raw_dir: env::get_or(EnvKey::RawDir, "./raw-videos").into(),
            processed_dir: env::get_or(EnvKey::ProcessedDir, "./processed-videos").into(),
            video_scale: env::get_or(EnvKey::VideoScale, "-1:360"),
            ffmpeg_path: env::get_or(EnvKey::FfmpegPath, "ffmpeg"),
            amqp_url: env::get_opt(EnvKey::AmqpUrl),
            video_queue: env::get_or(EnvKey::VideoQueue, "video_uploads"),
        })
    }
}
