use super::events::{JobDescriptor, validate_object_key};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

/// Push subscription request body.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PushRequest {
    pub message: PushMessage,
    #[serde(default)]
    pub subscription: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    /// Base64 encoded JSON upload notification.
    pub data: String,
    #[serde(default)]
    pub message_id: Option<String>,
}

/// Storage notification emitted when a raw video lands in the bucket.
#[derive(Debug, Deserialize, Validate)]
pub struct UploadNotification {
    #[validate(
        length(min = 1, message = "Object name is required"),
        custom(function = "validate_object_key")
    )]
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProcessVideoResponse {
    pub processed_key: String,
}

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Invalid push envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    #[error("Message data is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("Invalid message payload: {0}")]
    Payload(#[source] serde_json::Error),

    #[error("Invalid message payload: {0}")]
    Validation(#[from] ValidationErrors),
}

/// Decodes an HTTP push body into a job descriptor.
pub fn decode_push_body(body: &[u8]) -> Result<JobDescriptor, IntakeError> {
    let request: PushRequest = serde_json::from_slice(body).map_err(IntakeError::Envelope)?;
    debug!(
        message_id = ?request.message.message_id,
        subscription = ?request.subscription,
        "Decoding push message"
    );
    let payload = STANDARD.decode(request.message.data.trim())?;
    decode_notification(&payload)
}

/// Decodes a plain JSON upload notification into a job descriptor.
pub fn decode_notification(payload: &[u8]) -> Result<JobDescriptor, IntakeError> {
    let notification: UploadNotification =
        serde_json::from_slice(payload).map_err(IntakeError::Payload)?;
    notification.validate()?;
    Ok(JobDescriptor::new(notification.name))
}
