//! Clipvault API Library
//!
//! This crate provides the HTTP handlers, error mapping and application setup:
//! the byte-range object gateway (`GET`/`PUT /{path}/{file}`) and the clip
//! endpoints under `/api/clips`.

mod api_doc;
pub mod constants;
mod handlers;
pub mod setup;
mod telemetry;

// Public modules
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::{AppState, ClipState};
