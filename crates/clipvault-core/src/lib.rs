//! Clipvault Core Library
//!
//! This crate provides the domain models, error types, configuration and byte-range
//! resolution shared by the storage, database and API crates.

pub mod config;
pub mod error;
pub mod models;
pub mod range;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use range::{resolve_range, RangeError, RangeSpec};
pub use storage_types::StorageBackend;
