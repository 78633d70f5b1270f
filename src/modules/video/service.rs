use super::error::PipelineError;
use super::events::{JobDescriptor, validate_object_key};
use super::model::PipelineOutcome;
use super::staging::{KeyLocks, LocalStagingArea, StagingPaths};
use crate::config::settings::AppConfig;
use crate::infrastructure::encoder::{Encoder, EncodingProfile};
use crate::infrastructure::storage::ObjectStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

/// Everything the pipeline needs to know about where videos live.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub raw_bucket: String,
    pub processed_bucket: String,
    pub raw_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub profile: EncodingProfile,
}

impl From<&AppConfig> for PipelineConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            raw_bucket: config.raw_bucket.clone(),
            processed_bucket: config.processed_bucket.clone(),
            raw_dir: config.raw_dir.clone(),
            processed_dir: config.processed_dir.clone(),
            profile: EncodingProfile::new(config.video_scale.clone()),
        }
    }
}

/// Runs fetch → transform → publish → reclaim for one job at a time per key.
pub struct JobPipeline {
    store: Arc<dyn ObjectStore>,
    encoder: Arc<dyn Encoder>,
    staging: LocalStagingArea,
    locks: KeyLocks,
    raw_bucket: String,
    processed_bucket: String,
    profile: EncodingProfile,
}

impl JobPipeline {
    pub fn new(config: PipelineConfig, store: Arc<dyn ObjectStore>, encoder: Arc<dyn Encoder>) -> Self {
        Self {
            store,
            encoder,
            staging: LocalStagingArea::new(config.raw_dir, config.processed_dir),
            locks: KeyLocks::default(),
            raw_bucket: config.raw_bucket,
            processed_bucket: config.processed_bucket,
            profile: config.profile,
        }
    }

    pub fn staging(&self) -> &LocalStagingArea {
        &self.staging
    }

    /// Runs the job on its own task so a dropped caller (a disconnected push
    /// client, a cancelled consumer) cannot interrupt it between steps.
    pub async fn run(self: &Arc<Self>, job: &JobDescriptor) -> PipelineOutcome {
        let span = info_span!("job", job_id = %Uuid::new_v4(), object_key = %job.object_key);
        let pipeline = Arc::clone(self);
        let job = job.clone();

        let handle = tokio::spawn(async move { pipeline.run_to_completion(&job).await }.instrument(span));

        match handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("❌ Job task aborted: {}", e);
                PipelineOutcome::ProcessingFailure(format!("Job task aborted: {}", e))
            }
        }
    }

    async fn run_to_completion(&self, job: &JobDescriptor) -> PipelineOutcome {
        info!("📦 Processing job");
        match self.execute(job).await {
            Ok(processed_key) => {
                info!("✅ Job completed: published {}", processed_key);
                PipelineOutcome::Success { processed_key }
            }
            Err(e @ PipelineError::Validation(_)) => {
                warn!("❌ Rejected job: {}", e);
                e.into()
            }
            Err(e) => {
                error!(stage = e.stage(), "❌ Job failed: {}", e);
                e.into()
            }
        }
    }

    async fn execute(&self, job: &JobDescriptor) -> Result<String, PipelineError> {
        let key = job.object_key.as_str();
        validate_object_key(key).map_err(|e| PipelineError::Validation(e.to_string()))?;

        let _guard = self.locks.acquire(key).await;
        let paths = self.staging.paths_for(key);

        if let Err(e) = self.store.download(&self.raw_bucket, key, &paths.raw_path).await {
            self.cleanup(&paths).await;
            return Err(PipelineError::Fetch(e));
        }

        if let Err(e) = self
            .encoder
            .transform(&paths.raw_path, &paths.processed_path, &self.profile)
            .await
        {
            self.cleanup(&paths).await;
            return Err(PipelineError::Transform(e));
        }

        let published = self.publish(&paths).await;
        self.cleanup(&paths).await;
        published.map(|_| paths.processed_key)
    }

    async fn publish(&self, paths: &StagingPaths) -> Result<(), PipelineError> {
        self.store
            .upload(&self.processed_bucket, &paths.processed_path, &paths.processed_key)
            .await
            .map_err(PipelineError::Publish)?;

        self.store
            .make_public(&self.processed_bucket, &paths.processed_key)
            .await
            .map_err(PipelineError::Publish)
    }

    async fn cleanup(&self, paths: &StagingPaths) {
        let (raw, processed) = self.staging.reclaim(paths).await;
        if !(raw.is_clean() && processed.is_clean()) {
            warn!("Local files for {} may have leaked", paths.processed_key);
        }
    }
}
