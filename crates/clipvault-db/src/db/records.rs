//! Record abstractions for clip persistence
//!
//! These traits are the seam between the clip writer and the relational store,
//! allowing the writer and HTTP handlers to be tested without a database.

use async_trait::async_trait;
use clipvault_core::models::{Clip, ClipUpdate, NewClip};
use clipvault_core::AppError;

/// An open relational transaction holding an uncommitted insert.
#[async_trait]
pub trait RecordTransaction: Send {
    /// Commit the transaction. Fails if it already finished.
    async fn commit(&mut self) -> Result<(), AppError>;

    /// Roll the transaction back. A no-op once the transaction has finished.
    async fn rollback(&mut self) -> Result<(), AppError>;
}

/// Clip record operations
#[async_trait]
pub trait ClipRecords: Send + Sync {
    /// Get a clip by ID
    async fn find(&self, id: &str) -> Result<Option<Clip>, AppError>;

    async fn exists(&self, id: &str) -> Result<bool, AppError>;

    /// Newest clips first
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Clip>, AppError>;

    /// Substring match on title or description, newest first
    async fn search(&self, query: &str, limit: i64) -> Result<Vec<Clip>, AppError>;

    /// Write the changed columns. Returns `None` if the clip does not exist.
    async fn update(&self, id: &str, update: &ClipUpdate) -> Result<Option<Clip>, AppError>;

    /// Insert a new clip inside a fresh transaction.
    ///
    /// The row is invisible to other readers until the returned transaction commits.
    async fn begin_insert(
        &self,
        new_clip: &NewClip,
    ) -> Result<(Clip, Box<dyn RecordTransaction>), AppError>;
}
