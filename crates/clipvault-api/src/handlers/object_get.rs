//! Range-serving object gateway.
//!
//! `GET /{path}/{file}` streams the object stored under `{path}/{file}`, honouring
//! a single `Range: bytes=...` request. Multi-range requests are rejected with 416.
//!
//! `Content-Range` is rendered as `bytes {start}-{length}/{size}`: the second field
//! is the range length, not the inclusive end offset. Existing players depend on
//! it; see [`RangeSpec::content_range`].

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
};
use clipvault_core::{resolve_range, AppError, RangeError, RangeSpec};
use clipvault_storage::keys::object_key;
use clipvault_storage::StoredObject;
use futures::TryStreamExt;
use std::io::SeekFrom;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

#[utoipa::path(
    get,
    path = "/{path}/{file}",
    tag = "objects",
    params(
        ("path" = String, Path, description = "First key segment"),
        ("file" = String, Path, description = "Second key segment"),
        ("Range" = Option<String>, Header, description = "Single byte range, e.g. bytes=0-99")
    ),
    responses(
        (status = 200, description = "Whole object", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 206, description = "Requested byte range", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 400, description = "Malformed Range header", body = ErrorResponse),
        (status = 404, description = "Object not found", body = ErrorResponse),
        (status = 416, description = "Range not satisfiable or more than one range", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(operation = "get_object"))]
pub async fn get_object(
    State(state): State<Arc<AppState>>,
    Path((path, file)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, HttpAppError> {
    let key = object_key(&path, &file);

    let exists = state.storage.has_object(&key).await.map_err(|e| {
        tracing::error!(error = %e, key = %key, "Failed to check object existence");
        HttpAppError::from(e)
    })?;
    if !exists {
        return Err(AppError::NotFound(format!("Object {} not found", key)).into());
    }

    let StoredObject { mut reader, size } = state.storage.get_object(&key).await.map_err(|e| {
        tracing::error!(error = %e, key = %key, "Failed to get object");
        AppError::Storage(e.to_string())
    })?;

    let range_header = match headers.get(header::RANGE) {
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| AppError::from(RangeError::Malformed))?,
        ),
        None => None,
    };

    // `reader` is dropped with the error on every early return below.
    let Some(range) = resolve_range(range_header, size).map_err(AppError::from)? else {
        let body = stream_body(reader, key.clone());
        return build_response(StatusCode::OK, size, None, body);
    };

    // Seek before any header is committed so a failure can still become a 500.
    reader.seek(SeekFrom::Start(range.start)).await.map_err(|e| {
        tracing::error!(error = %e, key = %key, start = range.start, "Failed to seek to start of range");
        AppError::Storage(e.to_string())
    })?;

    tracing::debug!(
        key = %key,
        start = range.start,
        length = range.length,
        size_bytes = size,
        "Serving byte range"
    );

    let body = stream_body(reader.take(range.length), key);
    build_response(StatusCode::PARTIAL_CONTENT, range.length, Some((range, size)), body)
}

/// Body that owns the reader; it is dropped when the stream ends, errors, or the
/// client goes away.
fn stream_body<R>(reader: R, key: String) -> Body
where
    R: tokio::io::AsyncRead + Send + 'static,
{
    let stream = ReaderStream::new(reader).inspect_err(move |e| {
        tracing::error!(error = %e, key = %key, "Object stream failed mid-response");
    });
    Body::from_stream(stream)
}

fn build_response(
    status: StatusCode,
    content_length: u64,
    range: Option<(RangeSpec, u64)>,
    body: Body,
) -> Result<Response, HttpAppError> {
    let mut builder = Response::builder()
        .status(status)
        .header(header::CONTENT_LENGTH, content_length);

    if let Some((range, size)) = range {
        builder = builder
            .header(header::ACCEPT_RANGES, "bytes")
            .header(header::CONTENT_RANGE, range.content_range(size));
    }

    builder.body(body).map_err(|e| {
        tracing::error!(error = %e, "Failed to build response");
        HttpAppError::from(AppError::Internal(e.to_string()))
    })
}
