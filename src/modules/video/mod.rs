use axum::Router;
use axum::routing::post;
use crate::state::AppState;

pub mod dto;
pub mod error;
pub mod events;
pub mod handler;
pub mod model;
pub mod service;
pub mod staging;

#[cfg(test)]
pub(crate) mod fakes;

pub fn router() -> Router<AppState> {
    Router::new().route("/process-video", post(handler::process_video))
}
