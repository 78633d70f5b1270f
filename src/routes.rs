use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use crate::docs::ApiDoc;
use axum::Router;
use axum::routing::get;
use crate::state::AppState;

pub fn configure_routes() -> Router<AppState> {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(service_routes())
        .merge(crate::modules::video::router())
}

fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "Hello! I'm working." }))
        .route("/health", get(|| async { "ok" }))
}
