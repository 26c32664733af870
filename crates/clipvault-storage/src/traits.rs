//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use clipvault_core::AppError;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncSeek};

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => AppError::NotFound(format!("Object not found: {}", key)),
            StorageError::InvalidKey(msg) => AppError::BadRequest(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Request or upload body handed to [`Storage::put_object`].
///
/// The lifetime lets callers stream straight out of borrowed sources such as a
/// multipart field.
pub type ObjectBody<'a> = Box<dyn AsyncRead + Send + Unpin + 'a>;

/// Seekable reader over a stored object.
pub trait ObjectRead: AsyncRead + AsyncSeek + Send + Unpin {}

impl<T> ObjectRead for T where T: AsyncRead + AsyncSeek + Send + Unpin {}

/// An opened object. Dropping it releases the underlying handle.
pub struct StoredObject {
    pub reader: Box<dyn ObjectRead>,
    pub size: u64,
}

impl std::fmt::Debug for StoredObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredObject")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem, memory) implement this trait so the
/// HTTP gateway and the clip writer never couple to a specific backend.
///
/// Keys are opaque `/`-separated strings; see the crate root documentation.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Stream `body` into the object at `key`, replacing any existing object.
    ///
    /// `size_hint` is the expected length when the caller knows it. Returns the
    /// number of bytes written.
    async fn put_object(
        &self,
        key: &str,
        body: ObjectBody<'_>,
        size_hint: Option<u64>,
    ) -> StorageResult<u64>;

    /// Open the object at `key` for reading.
    ///
    /// Returns [`StorageError::NotFound`] when no object exists.
    async fn get_object(&self, key: &str) -> StorageResult<StoredObject>;

    /// Check whether an object exists at `key`
    async fn has_object(&self, key: &str) -> StorageResult<bool>;

    /// Delete the object at `key`. Deleting a missing object succeeds.
    async fn delete_object(&self, key: &str) -> StorageResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
