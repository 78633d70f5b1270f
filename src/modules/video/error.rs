use super::model::PipelineOutcome;
use crate::infrastructure::encoder::EncodeError;
use crate::infrastructure::storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid job descriptor: {0}")]
    Validation(String),

    #[error("Failed to fetch raw video: {0}")]
    Fetch(#[source] StorageError),

    #[error("Failed to transcode video: {0}")]
    Transform(#[source] EncodeError),

    #[error("Failed to publish processed video: {0}")]
    Publish(#[source] StorageError),
}

impl PipelineError {
    /// Step name used in logs.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Validation(_) => "validate",
            PipelineError::Fetch(_) => "fetch",
            PipelineError::Transform(_) => "transform",
            PipelineError::Publish(_) => "publish",
        }
    }
}

impl From<PipelineError> for PipelineOutcome {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Validation(reason) => PipelineOutcome::BadRequest(reason),
            other => PipelineOutcome::ProcessingFailure(other.to_string()),
        }
    }
}
