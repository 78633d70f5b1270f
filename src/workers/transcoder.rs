use crate::infrastructure::queue::rabbitmq::RabbitMqService;
use crate::modules::video::dto;
use crate::modules::video::model::PipelineOutcome;
use crate::state::AppState;
use futures_util::StreamExt;
use lapin::message::Delivery;
use lapin::options::{BasicAckOptions, BasicConsumeOptions, BasicNackOptions};
use lapin::types::FieldTable;
use std::time::Duration;
use tracing::{error, info, warn};

const CONSUMER_TAG: &str = "video_processing_worker";
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, PartialEq, Eq)]
enum Settlement {
    Ack,
    /// Dropped without requeue; redelivery is the broker's dead-letter policy.
    Reject,
}

fn settle(outcome: &PipelineOutcome) -> Settlement {
    match outcome {
        PipelineOutcome::ProcessingFailure(_) => Settlement::Reject,
        PipelineOutcome::Success { .. } | PipelineOutcome::BadRequest(_) => Settlement::Ack,
    }
}

pub async fn start_transcoder_worker(state: AppState, queue: RabbitMqService) {
    let queue_name = state.config.video_queue.clone();
    info!("🎥 Starting Transcoder Worker on '{}'", queue_name);

    loop {
        if let Err(e) = consume(&state, &queue, &queue_name).await {
            error!("❌ Transcoder consumer stopped: {}", e);
        } else {
            warn!("Transcoder consumer stream ended");
        }

        tokio::time::sleep(RECONNECT_DELAY).await;
        if let Err(e) = queue.reconnect().await {
            error!("❌ Failed to reconnect to RabbitMQ: {}", e);
        }
    }
}

async fn consume(state: &AppState, queue: &RabbitMqService, queue_name: &str) -> anyhow::Result<()> {
    queue.declare_queue(queue_name).await?;

    let channel = queue.get_channel().await;
    let channel_guard = channel.lock().await;
    let mut consumer = channel_guard
        .basic_consume(
            queue_name,
            CONSUMER_TAG,
            BasicConsumeOptions::default(),
            FieldTable::default(),
        )
        .await?;
    drop(channel_guard);

    info!("🎥 Transcoder Worker listening on '{}'", queue_name);

    while let Some(delivery) = consumer.next().await {
        match delivery {
            Ok(delivery) => handle_delivery(state, delivery).await,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

async fn handle_delivery(state: &AppState, delivery: Delivery) {
    info!("📦 Received upload notification");

    let outcome = match dto::decode_notification(&delivery.data) {
        Ok(job) => state.pipeline.run(&job).await,
        Err(e) => {
            error!("❌ Failed to parse notification: {}", e);
            PipelineOutcome::BadRequest(e.to_string())
        }
    };

    let settled = match settle(&outcome) {
        Settlement::Ack => delivery.ack(BasicAckOptions::default()).await,
        Settlement::Reject => {
            delivery
                .nack(BasicNackOptions {
                    requeue: false,
                    ..BasicNackOptions::default()
                })
                .await
        }
    };

    if let Err(e) = settled {
        error!("Failed to settle message: {}", e);
    }
}
