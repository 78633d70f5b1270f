use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app;
mod common;
mod config;
mod docs;
mod infrastructure;
mod modules;
mod routes;
mod state;
mod workers;

use config::settings::AppConfig;
use infrastructure::encoder::ffmpeg::FfmpegEncoder;
use infrastructure::queue::rabbitmq::RabbitMqService;
use infrastructure::storage::s3::StorageService;
use modules::video::service::{JobPipeline, PipelineConfig};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting video processing worker...");

    let config = AppConfig::new().context("Missing required environment variable")?;

    let storage = StorageService::new(
        &config.storage_endpoint,
        &config.storage_region,
        &config.storage_access_key,
        &config.storage_secret_key,
    );
    let encoder = FfmpegEncoder::new(config.ffmpeg_path.clone());

    let pipeline = JobPipeline::new(PipelineConfig::from(&config), Arc::new(storage), Arc::new(encoder));
    pipeline
        .staging()
        .ensure_directories()
        .await
        .context("Failed to prepare local staging directories")?;
    info!(
        "Staging raw videos in {} and processed videos in {}",
        pipeline.staging().raw_dir().display(),
        pipeline.staging().processed_dir().display()
    );

    let state = AppState::new(config.clone(), Arc::new(pipeline));

    if let Some(url) = &config.amqp_url {
        match RabbitMqService::new(url).await {
            Ok(queue) => {
                tokio::spawn(workers::transcoder::start_transcoder_worker(state.clone(), queue));
            }
            Err(e) => error!("❌ AMQP intake disabled: {}", e),
        }
    }

    let app = app::create_app(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Video processing worker listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
