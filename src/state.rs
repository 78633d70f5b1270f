use crate::config::settings::AppConfig;
use crate::modules::video::service::JobPipeline;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub pipeline: Arc<JobPipeline>,
}

impl AppState {
    pub fn new(config: AppConfig, pipeline: Arc<JobPipeline>) -> Self {
        Self { config, pipeline }
    }
}
