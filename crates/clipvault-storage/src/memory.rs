//! In-memory storage backend for development and tests.
//!
//! Objects are held as [`Bytes`] in a map; reads hand out cheap cursors over the
//! shared buffer. Fault switches let tests force puts, gets, seeks or deletes to
//! fail.

use crate::traits::{
    ObjectBody, ObjectRead, Storage, StorageError, StorageResult, StoredObject,
};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::io::{self, Cursor, SeekFrom};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, ReadBuf};

#[derive(Debug, Default)]
pub struct MemoryStorage {
    objects: RwLock<HashMap<String, Bytes>>,
    fail_puts: AtomicBool,
    fail_gets: AtomicBool,
    fail_seeks: AtomicBool,
    fail_deletes: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `put_object` fail (after the body has been read).
    pub fn set_fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    /// Make every following `get_object` fail. `has_object` is unaffected.
    pub fn set_fail_gets(&self, fail: bool) {
        self.fail_gets.store(fail, Ordering::SeqCst);
    }

    /// Hand out readers whose seeks fail. Sequential reads still succeed.
    pub fn set_fail_seeks(&self, fail: bool) {
        self.fail_seeks.store(fail, Ordering::SeqCst);
    }

    /// Make every following `delete_object` fail.
    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.read().map(|objects| objects.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted list of stored keys.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .read()
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    fn poisoned() -> StorageError {
        StorageError::BackendError("memory storage lock poisoned".to_string())
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn put_object(
        &self,
        key: &str,
        mut body: ObjectBody<'_>,
        size_hint: Option<u64>,
    ) -> StorageResult<u64> {
        let mut buffer = Vec::with_capacity(size_hint.unwrap_or(0).min(1 << 20) as usize);
        body.read_to_end(&mut buffer)
            .await
            .map_err(|e| StorageError::UploadFailed(format!("Failed to read body: {}", e)))?;

        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed(format!(
                "Injected put failure for {}",
                key
            )));
        }

        let size = buffer.len() as u64;
        self.objects
            .write()
            .map_err(|_| Self::poisoned())?
            .insert(key.to_string(), Bytes::from(buffer));

        tracing::debug!(key = %key, size_bytes = size, "Memory storage put successful");
        Ok(size)
    }

    async fn get_object(&self, key: &str) -> StorageResult<StoredObject> {
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(StorageError::DownloadFailed(format!(
                "Injected get failure for {}",
                key
            )));
        }

        let data = self
            .objects
            .read()
            .map_err(|_| Self::poisoned())?
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;

        let size = data.len() as u64;
        let cursor = Cursor::new(data);
        let reader: Box<dyn ObjectRead> = if self.fail_seeks.load(Ordering::SeqCst) {
            Box::new(FailingSeek(cursor))
        } else {
            Box::new(cursor)
        };
        Ok(StoredObject { reader, size })
    }

    async fn has_object(&self, key: &str) -> StorageResult<bool> {
        Ok(self
            .objects
            .read()
            .map_err(|_| Self::poisoned())?
            .contains_key(key))
    }

    async fn delete_object(&self, key: &str) -> StorageResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::DeleteFailed(format!(
                "Injected delete failure for {}",
                key
            )));
        }

        self.objects
            .write()
            .map_err(|_| Self::poisoned())?
            .remove(key);
        tracing::debug!(key = %key, "Memory storage delete successful");
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}

/// Reader that delegates reads and refuses every seek.
struct FailingSeek<R>(R);

impl<R: AsyncRead + Unpin> AsyncRead for FailingSeek<R> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.0).poll_read(cx, buf)
    }
}

impl<R: Unpin> AsyncSeek for FailingSeek<R> {
    fn start_seek(self: Pin<&mut Self>, _position: SeekFrom) -> io::Result<()> {
        Err(io::Error::other("Injected seek failure"))
    }

    fn poll_complete(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<u64>> {
        Poll::Ready(Err(io::Error::other("Injected seek failure")))
    }
}
