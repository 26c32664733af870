//! Application state and sub-state extractors.
//!
//! Store handles are built once in `setup` and shared by every handler. The clip
//! endpoints only need [`ClipState`], which handlers can extract on its own via
//! Axum's `FromRef`.

use axum::extract::FromRef;
use clipvault_core::Config;
use clipvault_db::{ClipRecords, ClipWriter};
use clipvault_storage::Storage;
use std::sync::Arc;

/// Clip records and the transactional writer over the same stores.
#[derive(Clone)]
pub struct ClipState {
    pub records: Arc<dyn ClipRecords>,
    pub writer: ClipWriter,
}

impl ClipState {
    pub fn new(records: Arc<dyn ClipRecords>, storage: Arc<dyn Storage>) -> Self {
        Self {
            writer: ClipWriter::new(Arc::clone(&records), storage),
            records,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub clips: ClipState,
}

impl AppState {
    pub fn new(config: Config, records: Arc<dyn ClipRecords>, storage: Arc<dyn Storage>) -> Self {
        Self {
            config,
            clips: ClipState::new(records, Arc::clone(&storage)),
            storage,
        }
    }
}

impl FromRef<Arc<AppState>> for ClipState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.clips.clone()
    }
}
