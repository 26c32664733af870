//! Database module
//!
//! Contains the clip repository, the record traits the writer depends on and the
//! transaction wrapper.

pub mod clip;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod records;
pub mod transaction;

pub use clip::ClipRepository;
#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryClipRecords;
pub use records::{ClipRecords, RecordTransaction};
pub use transaction::PgRecordTransaction;
