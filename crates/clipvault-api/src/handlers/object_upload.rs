use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
};
use clipvault_storage::keys::object_key;
use futures::TryStreamExt;
use std::sync::Arc;
use tokio_util::io::StreamReader;

/// Store the request body under `{path}/{file}`, replacing any existing object.
#[utoipa::path(
    put,
    path = "/{path}/{file}",
    tag = "objects",
    params(
        ("path" = String, Path, description = "First key segment"),
        ("file" = String, Path, description = "Second key segment")
    ),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Object stored"),
        (status = 400, description = "Invalid key", body = ErrorResponse),
        (status = 413, description = "Body exceeds the upload limit", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(operation = "put_object"))]
pub async fn put_object(
    State(state): State<Arc<AppState>>,
    Path((path, file)): Path<(String, String)>,
    headers: HeaderMap,
    body: Body,
) -> Result<StatusCode, HttpAppError> {
    let key = object_key(&path, &file);
    let size_hint = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    let reader = StreamReader::new(body.into_data_stream().map_err(std::io::Error::other));

    let size = state
        .storage
        .put_object(&key, Box::new(reader), size_hint)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, key = %key, "Failed to store object");
            HttpAppError::from(e)
        })?;

    tracing::info!(key = %key, size_bytes = size, "Object stored");
    Ok(StatusCode::OK)
}
