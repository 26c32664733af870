//! Clipvault Database Layer
//!
//! Clip persistence and the transactional clip writer that keeps clip rows and
//! their stored video payloads consistent.

pub mod db;
pub mod writer;

// Re-exports: Repositories and record abstractions
pub use db::{ClipRecords, ClipRepository, PgRecordTransaction, RecordTransaction};

#[cfg(any(test, feature = "test-util"))]
pub use db::MemoryClipRecords;

// Re-exports: Clip writer
pub use writer::{ClipSession, ClipWriter, SessionState};
