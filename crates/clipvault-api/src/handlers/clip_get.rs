use crate::constants::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::ClipState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use clipvault_core::models::Clip;
use clipvault_core::AppError;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[utoipa::path(
    get,
    path = "/api/clips/{id}",
    tag = "clips",
    params(
        ("id" = String, Path, description = "Clip ID")
    ),
    responses(
        (status = 200, description = "Clip found", body = Clip),
        (status = 404, description = "Clip not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(clips), fields(clip_id = %id, operation = "get_clip"))]
pub async fn get_clip(
    Path(id): Path<String>,
    State(clips): State<ClipState>,
) -> Result<impl IntoResponse, HttpAppError> {
    let clip = clips
        .records
        .find(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Clip {} not found", id)))?;

    Ok(Json(clip))
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct ListClipsQuery {
    /// Substring matched against title and description
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_LIMIT
}

/// List clips newest first, or search them when `q` is given.
///
/// Search results are capped at `limit` and ignore `offset`.
#[utoipa::path(
    get,
    path = "/api/clips",
    tag = "clips",
    params(ListClipsQuery),
    responses(
        (status = 200, description = "List of clips", body = Vec<Clip>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(clips, query),
    fields(
        limit = query.limit,
        offset = query.offset,
        search = query.q.is_some(),
        operation = "list_clips"
    )
)]
pub async fn list_clips(
    State(clips): State<ClipState>,
    Query(query): Query<ListClipsQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let limit = query.limit.clamp(1, MAX_PAGE_LIMIT);
    let offset = query.offset.max(0);

    let results = match query.q.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => clips.records.search(q, limit).await?,
        _ => clips.records.list(limit, offset).await?,
    };

    Ok(Json(results))
}
