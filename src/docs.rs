use utoipa::OpenApi;
use crate::common::response::ResponseStatus;
use crate::modules::video::dto::{ProcessVideoResponse, PushMessage, PushRequest};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::video::handler::process_video,
    ),
    components(
        schemas(PushRequest, PushMessage, ProcessVideoResponse, ResponseStatus)
    ),
    tags(
        (name = "Processing", description = "Raw video transcoding")
    )
)]
pub struct ApiDoc;
