use axum::http::StatusCode;

/// Terminal result of one pipeline run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PipelineOutcome {
    Success { processed_key: String },
    BadRequest(String),
    ProcessingFailure(String),
}

impl PipelineOutcome {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PipelineOutcome::Success { .. } => StatusCode::OK,
            PipelineOutcome::BadRequest(_) => StatusCode::BAD_REQUEST,
            PipelineOutcome::ProcessingFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            PipelineOutcome::Success { .. } => "Processing finished successfully".to_string(),
            PipelineOutcome::BadRequest(reason) => format!("Bad Request: {}", reason),
            PipelineOutcome::ProcessingFailure(reason) => format!("Processing failed: {}", reason),
        }
    }
}
