//! In-memory clip records for testing without a database.
//!
//! Inserts are staged per transaction and only become visible on commit, matching
//! the isolation the Postgres repository provides.

use async_trait::async_trait;
use chrono::Utc;
use clipvault_core::models::{Clip, ClipUpdate, NewClip};
use clipvault_core::AppError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::records::{ClipRecords, RecordTransaction};

#[derive(Default)]
struct Inner {
    clips: HashMap<String, Clip>,
    open_transactions: usize,
    fail_next_insert: bool,
    fail_next_commit: bool,
}

#[derive(Clone, Default)]
pub struct MemoryClipRecords {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryClipRecords {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a clip as if it had been committed earlier.
    pub fn add_clip(&self, clip: Clip) {
        self.lock().clips.insert(clip.id.clone(), clip);
    }

    /// Make the next `begin_insert` fail.
    pub fn fail_next_insert(&self) {
        self.lock().fail_next_insert = true;
    }

    /// Make the next transaction commit fail.
    pub fn fail_next_commit(&self) {
        self.lock().fail_next_commit = true;
    }

    /// Transactions begun but neither committed nor rolled back.
    pub fn open_transactions(&self) -> usize {
        self.lock().open_transactions
    }

    pub fn len(&self) -> usize {
        self.lock().clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn sorted(clips: impl Iterator<Item = Clip>) -> Vec<Clip> {
        let mut clips: Vec<Clip> = clips.collect();
        clips.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        clips
    }
}

#[async_trait]
impl ClipRecords for MemoryClipRecords {
    async fn find(&self, id: &str) -> Result<Option<Clip>, AppError> {
        Ok(self.lock().clips.get(id).cloned())
    }

    async fn exists(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.lock().clips.contains_key(id))
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Clip>, AppError> {
        let clips = Self::sorted(self.lock().clips.values().cloned());
        Ok(clips
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn search(&self, query: &str, limit: i64) -> Result<Vec<Clip>, AppError> {
        let needle = query.to_lowercase();
        let matches = self
            .lock()
            .clips
            .values()
            .filter(|clip| {
                clip.title.to_lowercase().contains(&needle)
                    || clip.description.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect::<Vec<_>>();
        Ok(Self::sorted(matches.into_iter())
            .into_iter()
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn update(&self, id: &str, update: &ClipUpdate) -> Result<Option<Clip>, AppError> {
        let mut inner = self.lock();
        let Some(clip) = inner.clips.get_mut(id) else {
            return Ok(None);
        };
        if !update.is_empty() {
            update.apply_to(clip);
            clip.updated_at = Utc::now();
        }
        Ok(Some(clip.clone()))
    }

    async fn begin_insert(
        &self,
        new_clip: &NewClip,
    ) -> Result<(Clip, Box<dyn RecordTransaction>), AppError> {
        let mut inner = self.lock();
        if std::mem::take(&mut inner.fail_next_insert) {
            return Err(AppError::Internal("Injected insert failure".to_string()));
        }
        inner.open_transactions += 1;
        drop(inner);

        let now = Utc::now();
        let clip = Clip {
            id: Clip::generate_id(),
            title: new_clip.title.clone(),
            description: new_clip.description.clone(),
            unlisted: new_clip.unlisted,
            created_at: now,
            updated_at: now,
        };

        let transaction = MemoryTransaction {
            records: self.clone(),
            staged: Some(clip.clone()),
        };
        Ok((clip, Box::new(transaction)))
    }
}

struct MemoryTransaction {
    records: MemoryClipRecords,
    staged: Option<Clip>,
}

#[async_trait]
impl RecordTransaction for MemoryTransaction {
    async fn commit(&mut self) -> Result<(), AppError> {
        let clip = self.staged.take().ok_or_else(|| {
            AppError::Internal("Transaction was already committed or rolled back".to_string())
        })?;
        let mut inner = self.records.lock();
        inner.open_transactions -= 1;
        // A failed commit still ends the transaction, as it does in Postgres.
        if std::mem::take(&mut inner.fail_next_commit) {
            return Err(AppError::Internal("Injected commit failure".to_string()));
        }
        inner.clips.insert(clip.id.clone(), clip);
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), AppError> {
        if self.staged.take().is_some() {
            self.records.lock().open_transactions -= 1;
        }
        Ok(())
    }
}

impl Drop for MemoryTransaction {
    fn drop(&mut self) {
        if self.staged.take().is_some() {
            self.records.lock().open_transactions -= 1;
        }
    }
}
