//! Transactional clip writer
//!
//! A clip is a row in `clips` plus a video object under `<id>/video`. The object
//! store cannot join the database transaction, so creation is a three-step
//! protocol driven by the caller:
//!
//! 1. [`ClipWriter::begin`] validates the input, opens a transaction and inserts
//!    the row.
//! 2. [`ClipSession::upload_video`] (and [`ClipSession::upload_asset`]) stream
//!    payloads into object storage.
//! 3. [`ClipSession::commit`] or [`ClipSession::rollback`] finishes the session.
//!
//! Rollback compensates by deleting every object the session may have written
//! before rolling the transaction back. If a delete fails the transaction is left
//! open and [`AppError::Consistency`] names the object that may remain.
//!
//! A process crash between upload and commit leaves the object orphaned; nothing
//! here reclaims it.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use clipvault_core::models::{Clip, NewClip};
use clipvault_core::AppError;
use clipvault_storage::keys::{clip_asset_key, clip_video_key};
use clipvault_storage::{ObjectBody, Storage};
use validator::Validate;

use crate::db::{ClipRecords, RecordTransaction};

const VIDEO_ASSET: &str = "video";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Pending,
    Committed,
    RolledBack,
}

impl Display for SessionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SessionState::Pending => write!(f, "pending"),
            SessionState::Committed => write!(f, "committed"),
            SessionState::RolledBack => write!(f, "rolled_back"),
        }
    }
}

/// Creates clips atomically across the relational store and object storage.
#[derive(Clone)]
pub struct ClipWriter {
    records: Arc<dyn ClipRecords>,
    storage: Arc<dyn Storage>,
}

impl ClipWriter {
    pub fn new(records: Arc<dyn ClipRecords>, storage: Arc<dyn Storage>) -> Self {
        Self { records, storage }
    }

    /// Insert the clip row inside a new transaction.
    ///
    /// On failure there is no session and nothing to clean up.
    pub async fn begin(&self, new_clip: NewClip) -> Result<ClipSession, AppError> {
        new_clip.validate()?;

        let (clip, transaction) = self.records.begin_insert(&new_clip).await?;

        tracing::debug!(clip_id = %clip.id, "Clip session started");

        Ok(ClipSession {
            clip,
            transaction,
            storage: Arc::clone(&self.storage),
            assets: Vec::new(),
            state: SessionState::Pending,
        })
    }

    /// Run the whole protocol for a single video upload.
    ///
    /// Any failure after the row is inserted triggers [`ClipSession::rollback`]. If
    /// that rollback fails its consistency error is returned instead of the
    /// original error, which is logged.
    pub async fn create(
        &self,
        new_clip: NewClip,
        video: ObjectBody<'_>,
        size_hint: Option<u64>,
    ) -> Result<Clip, AppError> {
        let mut session = self.begin(new_clip).await?;

        let result = match session.upload_video(video, size_hint).await {
            Ok(_) => session.commit().await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => Ok(session.clip().clone()),
            Err(e) => {
                if let Err(rollback_err) = session.rollback().await {
                    tracing::error!(
                        error = %rollback_err,
                        original_error = %e,
                        clip_id = %session.clip().id,
                        "Failed to roll back clip creation"
                    );
                    return Err(rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// An in-progress clip creation. See the module documentation for the protocol.
pub struct ClipSession {
    clip: Clip,
    transaction: Box<dyn RecordTransaction>,
    storage: Arc<dyn Storage>,
    // Sidecar keys written (or attempted) during this session.
    assets: Vec<String>,
    state: SessionState,
}

impl ClipSession {
    /// The inserted row. Not visible to other readers until commit.
    pub fn clip(&self) -> &Clip {
        &self.clip
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    fn ensure_pending(&self, operation: &str) -> Result<(), AppError> {
        if self.state != SessionState::Pending {
            return Err(AppError::SessionFinished(format!(
                "cannot {} clip {}: session is {}",
                operation, self.clip.id, self.state
            )));
        }
        Ok(())
    }

    /// Stream the video payload to `<id>/video`, replacing any earlier upload.
    pub async fn upload_video(
        &mut self,
        body: ObjectBody<'_>,
        size_hint: Option<u64>,
    ) -> Result<u64, AppError> {
        self.ensure_pending("upload video for")?;

        let key = clip_video_key(&self.clip.id);
        let size = self.storage.put_object(&key, body, size_hint).await?;

        tracing::info!(clip_id = %self.clip.id, key = %key, size_bytes = size, "Clip video uploaded");
        Ok(size)
    }

    /// Stream a sidecar asset (thumbnail, captions) to `<id>/<name>`.
    pub async fn upload_asset(
        &mut self,
        name: &str,
        body: ObjectBody<'_>,
        size_hint: Option<u64>,
    ) -> Result<u64, AppError> {
        self.ensure_pending("upload asset for")?;

        if name.is_empty() || name == VIDEO_ASSET || name.contains('/') || name.contains("..") {
            return Err(AppError::InvalidInput(format!(
                "Invalid asset name: {:?}",
                name
            )));
        }

        let key = clip_asset_key(&self.clip.id, name);
        // Track before writing; a failed put may still leave a partial object.
        if !self.assets.contains(&key) {
            self.assets.push(key.clone());
        }
        let size = self.storage.put_object(&key, body, size_hint).await?;

        tracing::info!(clip_id = %self.clip.id, key = %key, size_bytes = size, "Clip asset uploaded");
        Ok(size)
    }

    /// Commit the row. On failure the session stays pending so that
    /// [`ClipSession::rollback`] still removes the uploaded objects.
    pub async fn commit(&mut self) -> Result<(), AppError> {
        self.ensure_pending("commit")?;

        if let Err(e) = self.transaction.commit().await {
            tracing::error!(error = %e, clip_id = %self.clip.id, "Failed to commit clip");
            return Err(e);
        }

        self.state = SessionState::Committed;
        tracing::info!(clip_id = %self.clip.id, "Clip committed");
        Ok(())
    }

    /// Delete the session's objects, then roll the row back.
    ///
    /// A no-op once the session is committed or rolled back.
    pub async fn rollback(&mut self) -> Result<(), AppError> {
        if self.state != SessionState::Pending {
            tracing::debug!(clip_id = %self.clip.id, state = %self.state, "Rollback on finished clip session ignored");
            return Ok(());
        }

        let keys = std::iter::once(clip_video_key(&self.clip.id)).chain(self.assets.iter().cloned());
        for key in keys {
            if let Err(e) = self.storage.delete_object(&key).await {
                tracing::error!(
                    error = %e,
                    clip_id = %self.clip.id,
                    key = %key,
                    "Compensating delete failed; clip transaction left open"
                );
                return Err(AppError::Consistency {
                    key,
                    message: e.to_string(),
                });
            }
        }

        self.transaction.rollback().await?;
        self.state = SessionState::RolledBack;

        tracing::info!(clip_id = %self.clip.id, "Clip rolled back");
        Ok(())
    }
}

impl Drop for ClipSession {
    fn drop(&mut self) {
        if self.state == SessionState::Pending {
            tracing::warn!(
                clip_id = %self.clip.id,
                "Clip session dropped while pending - uploaded objects may be orphaned"
            );
        }
    }
}
