use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::ClipState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use clipvault_core::models::{Clip, ClipUpdate};
use clipvault_core::AppError;
use validator::Validate;

/// Change some of a clip's columns. Omitted fields keep their value.
#[utoipa::path(
    patch,
    path = "/api/clips/{id}",
    tag = "clips",
    params(
        ("id" = String, Path, description = "Clip ID")
    ),
    request_body = ClipUpdate,
    responses(
        (status = 200, description = "Clip updated", body = Clip),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Clip not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(clips, update), fields(clip_id = %id, operation = "update_clip"))]
pub async fn update_clip(
    Path(id): Path<String>,
    State(clips): State<ClipState>,
    ValidatedJson(update): ValidatedJson<ClipUpdate>,
) -> Result<impl IntoResponse, HttpAppError> {
    update.validate().map_err(AppError::from)?;

    let clip = clips
        .records
        .update(&id, &update)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Clip {} not found", id)))?;

    tracing::info!(clip_id = %clip.id, "Clip updated");
    Ok(Json(clip))
}
