//! Clipvault Storage Library
//!
//! Object storage for clip payloads and arbitrary uploaded files. Provides the
//! [`Storage`] trait and implementations for S3, the local filesystem and memory.
//!
//! # Object keys
//!
//! Keys are hierarchical, `/`-separated strings:
//!
//! - **Plain uploads**: `{path}/{file}`
//! - **Clip payloads**: `{clip_id}/video`
//! - **Clip sidecars**: `{clip_id}/{asset}`
//!
//! Keys must not contain `..` or a leading `/`. Key construction lives in the
//! [`keys`] module so every caller agrees on the layout.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod memory;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use clipvault_core::StorageBackend;
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use memory::MemoryStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ObjectBody, ObjectRead, Storage, StorageError, StorageResult, StoredObject};
