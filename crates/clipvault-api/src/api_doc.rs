//! OpenAPI documentation, served at [`crate::constants::OPENAPI_PATH`].

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use clipvault_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Clipvault API",
        version = "0.1.0",
        description = "Video clip storage with byte-range streaming. Objects are addressed as /{path}/{file}; clip records live under /api/clips."
    ),
    paths(
        // Clips
        handlers::clip_upload::upload_clip,
        handlers::clip_get::get_clip,
        handlers::clip_get::list_clips,
        handlers::clip_update::update_clip,
        // Objects
        handlers::object_get::get_object,
        handlers::object_upload::put_object,
    ),
    components(
        schemas(
            models::Clip,
            models::NewClip,
            models::ClipUpdate,
            models::ClipCreatedResponse,
            handlers::clip_get::ListClipsQuery,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "clips", description = "Clip records and transactional clip upload"),
        (name = "objects", description = "Raw object upload and range-serving download")
    )
)]
pub struct ApiDoc;
