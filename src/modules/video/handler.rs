use super::dto::{self, ProcessVideoResponse, PushRequest};
use super::model::PipelineOutcome;
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
};
use tracing::warn;

impl IntoResponse for PipelineOutcome {
    fn into_response(self) -> Response {
        let (status, message) = (self.status_code(), self.message());
        match self {
            PipelineOutcome::Success { processed_key } => ApiSuccess(
                ApiResponse::success(ProcessVideoResponse { processed_key }, &message),
                status,
            )
            .into_response(),
            _ => ApiError(message, status).into_response(),
        }
    }
}

/// Process an uploaded raw video
#[utoipa::path(
    post,
    path = "/process-video",
    request_body = PushRequest,
    responses(
        (status = 200, description = "Video processed and published", body = ApiResponse<ProcessVideoResponse>),
        (status = 400, description = "Malformed notification"),
        (status = 500, description = "Processing failed")
    ),
    tag = "Processing"
)]
pub async fn process_video(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let job = match dto::decode_push_body(&body) {
        Ok(job) => job,
        Err(e) => {
            warn!("❌ Rejected notification: {}", e);
            return PipelineOutcome::BadRequest(e.to_string()).into_response();
        }
    };

    state.pipeline.run(&job).await.into_response()
}

#[cfg(test)]
mod tests {
    use crate::app::create_app;
    use crate::config::settings::AppConfig;
    use crate::modules::video::fakes::{FakeEncoder, FakeStore};
    use crate::modules::video::service::{JobPipeline, PipelineConfig};
    use crate::state::AppState;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_config(dir: &TempDir) -> AppConfig {
        AppConfig {
            server_port: 0,
            storage_endpoint: "http://localhost:9000".to_string(),
            storage_region: "us-east-1".to_string(),
            storage_access_key: "test".to_string(),
            storage_secret_key: "test".to_string(),
            raw_bucket: "raw-videos".to_string(),
            processed_bucket: "processed-videos".to_string(),
            raw_dir: dir.path().join("raw-videos"),
            processed_dir: dir.path().join("processed-videos"),
            video_scale: "-1:360".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
            amqp_url: None,
            video_queue: "video_uploads".to_string(),
        }
    }

    async fn state_with(dir: &TempDir, store: Arc<FakeStore>, encoder: Arc<FakeEncoder>) -> AppState {
        let config = test_config(dir);
        let pipeline = JobPipeline::new(PipelineConfig::from(&config), store, encoder);
        pipeline.staging().ensure_directories().await.unwrap();
        AppState::new(config, Arc::new(pipeline))
    }

    fn push(payload: serde_json::Value) -> Request<Body> {
        let body = json!({ "message": { "data": STANDARD.encode(payload.to_string()) } });
        Request::builder()
            .method("POST")
            .uri("/process-video")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn valid_notification_returns_ok() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FakeStore::with_object("clip1.mp4"));
        let encoder = Arc::new(FakeEncoder::succeeding());
        let app = create_app(state_with(&dir, store.clone(), encoder).await);

        let response = app.oneshot(push(json!({ "name": "clip1.mp4" }))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.public_keys(), vec!["processed-videos/processed-clip1.mp4"]);
        assert!(!dir.path().join("raw-videos/clip1.mp4").exists());
        assert!(!dir.path().join("processed-videos/processed-clip1.mp4").exists());
    }

    #[tokio::test]
    async fn notification_without_name_is_a_bad_request() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FakeStore::with_object("clip1.mp4"));
        let encoder = Arc::new(FakeEncoder::succeeding());
        let app = create_app(state_with(&dir, store.clone(), encoder.clone()).await);

        let response = app.oneshot(push(json!({}))).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.downloads(), 0);
        assert_eq!(encoder.calls(), 0);
    }

    #[tokio::test]
    async fn garbage_body_is_a_bad_request() {
        let dir = TempDir::new().unwrap();
        let app = create_app(
            state_with(&dir, Arc::new(FakeStore::default()), Arc::new(FakeEncoder::succeeding())).await,
        );

        let request = Request::builder()
            .method("POST")
            .uri("/process-video")
            .body(Body::from("{{{"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn transform_failure_is_an_internal_error() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FakeStore::with_object("clip2.mp4"));
        let encoder = Arc::new(FakeEncoder::failing("invalid data found"));
        let app = create_app(state_with(&dir, store.clone(), encoder).await);

        let response = app.oneshot(push(json!({ "name": "clip2.mp4" }))).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(store.upload_calls(), 0);
    }

    #[tokio::test]
    async fn disconnected_client_still_gets_its_files_reclaimed() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FakeStore::with_object("clip3.mp4"));
        let encoder = Arc::new(FakeEncoder::succeeding().with_delay(Duration::from_millis(300)));
        let app = create_app(state_with(&dir, store.clone(), encoder).await);
        let raw = dir.path().join("raw-videos/clip3.mp4");
        let processed = dir.path().join("processed-videos/processed-clip3.mp4");

        let request = app.oneshot(push(json!({ "name": "clip3.mp4" })));
        assert!(tokio::time::timeout(Duration::from_millis(100), request).await.is_err());

        let settled = async {
            while store.public_keys().is_empty() || raw.exists() || processed.exists() {
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        };
        tokio::time::timeout(Duration::from_secs(5), settled)
            .await
            .expect("staged files were never reclaimed");

        assert_eq!(store.public_keys(), vec!["processed-videos/processed-clip3.mp4"]);
    }

    #[tokio::test]
    async fn root_reports_liveness() {
        let dir = TempDir::new().unwrap();
        let app = create_app(
            state_with(&dir, Arc::new(FakeStore::default()), Arc::new(FakeEncoder::succeeding())).await,
        );

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
