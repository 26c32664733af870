//! Route groups.

use crate::constants::CLIPS_PATH;
use crate::handlers;
use crate::state::AppState;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

pub fn clip_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            CLIPS_PATH,
            get(handlers::clip_get::list_clips).post(handlers::clip_upload::upload_clip),
        )
        .route(
            &format!("{}/{{id}}", CLIPS_PATH),
            get(handlers::clip_get::get_clip).patch(handlers::clip_update::update_clip),
        )
}

/// `/{path}/{file}` addresses the object stored under that key. Static routes
/// (`/api/...`) take precedence, so an object keyed `api/clips` is not reachable.
pub fn object_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/{path}/{file}",
        get(handlers::object_get::get_object).put(handlers::object_upload::put_object),
    )
}
