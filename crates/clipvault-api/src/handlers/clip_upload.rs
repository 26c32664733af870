use crate::error::{ErrorResponse, HttpAppError};
use crate::state::ClipState;
use axum::{
    extract::{Multipart, State},
    Json,
};
use clipvault_core::models::{ClipCreatedResponse, NewClip};
use clipvault_core::AppError;
use futures::TryStreamExt;
use tokio_util::io::StreamReader;

const METADATA_FIELD: &str = "json";
const VIDEO_FIELD: &str = "video";

/// Create a clip from a multipart body.
///
/// The `json` field carries the clip metadata and must come before the `video`
/// field, which is streamed straight into object storage. The row and the video
/// are created together or not at all.
#[utoipa::path(
    post,
    path = "/api/clips",
    tag = "clips",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Clip created", body = ClipCreatedResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(operation = "upload_clip"))]
pub async fn upload_clip(
    State(clips): State<ClipState>,
    mut multipart: Multipart,
) -> Result<Json<ClipCreatedResponse>, HttpAppError> {
    let mut new_clip: Option<NewClip> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(METADATA_FIELD) => {
                let bytes = field.bytes().await?;
                new_clip = Some(serde_json::from_slice::<NewClip>(&bytes).map_err(AppError::from)?);
            }
            Some(VIDEO_FIELD) => {
                let new_clip = new_clip.take().ok_or_else(|| {
                    AppError::InvalidInput(format!(
                        "Field '{}' must precede field '{}'",
                        METADATA_FIELD, VIDEO_FIELD
                    ))
                })?;

                let video = StreamReader::new(field.map_err(std::io::Error::other));
                let clip = clips
                    .writer
                    .create(new_clip, Box::new(video), None)
                    .await?;

                tracing::info!(clip_id = %clip.id, "Clip created");
                return Ok(Json(ClipCreatedResponse { id: clip.id }));
            }
            other => {
                tracing::debug!(field = ?other, "Ignoring unknown multipart field");
            }
        }
    }

    Err(AppError::InvalidInput(format!("Missing field '{}'", VIDEO_FIELD)).into())
}
