use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    StorageEndpoint,
    StorageRegion,
    StorageAccessKey,
    StorageSecretKey,
    RawBucket,
    ProcessedBucket,
    RawDir,
    ProcessedDir,
    VideoScale,
    FfmpegPath,
    AmqpUrl,
    VideoQueue,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::StorageEndpoint => "STORAGE_ENDPOINT",
            EnvKey::StorageRegion => "STORAGE_REGION",
            EnvKey::StorageAccessKey => "STORAGE_ACCESS_KEY_ID",
            EnvKey::StorageSecretKey => "STORAGE_SECRET_ACCESS_KEY",
            EnvKey::RawBucket => "RAW_VIDEO_BUCKET",
            EnvKey::ProcessedBucket => "PROCESSED_VIDEO_BUCKET",
            EnvKey::RawDir => "LOCAL_RAW_VIDEO_DIR",
            EnvKey::ProcessedDir => "LOCAL_PROCESSED_VIDEO_DIR",
            EnvKey::VideoScale => "VIDEO_SCALE",
            EnvKey::FfmpegPath => "FFMPEG_PATH",
            EnvKey::AmqpUrl => "AMQP_URL",
            EnvKey::VideoQueue => "VIDEO_QUEUE",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_opt(key: EnvKey) -> Option<String> {
    env::var(key.as_str()).ok().filter(|v| !v.trim().is_empty())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
