// src/storage/memory.rs
//! In-memory storage backend

use super::{Storage, StorageError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Storage backed by an in-process map
///
/// Uploads to keys registered with [`MemoryStorage::fail_uploads_to`] and
/// downloads of keys registered with [`MemoryStorage::fail_downloads_from`]
/// fail with a request error, which lets tests stop the publish pipeline at a
/// chosen step.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    failing: Mutex<BTreeSet<String>>,
    failing_downloads: Mutex<BTreeSet<String>>,
    uploads: Mutex<Vec<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every upload to `key` fail
    pub fn fail_uploads_to(&self, key: impl Into<String>) {
        self.failing.lock().insert(key.into());
    }

    /// Make every download of `key` fail, whether or not it exists
    pub fn fail_downloads_from(&self, key: impl Into<String>) {
        self.failing_downloads.lock().insert(key.into());
    }

    /// Seed an object without going through `upload`
    pub fn insert(&self, key: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.objects.lock().insert(key.into(), data.into());
    }

    /// Current content of `key`
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().get(key).cloned()
    }

    /// All stored keys, sorted
    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().keys().cloned().collect()
    }

    /// Keys in the order successful uploads happened
    pub fn upload_log(&self) -> Vec<String> {
        self.uploads.lock().clone()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn upload(
        &self,
        key: &str,
        data: &[u8],
        cancel: &CancellationToken,
    ) -> Result<(), StorageError> {
        if cancel.is_cancelled() {
            return Err(StorageError::Cancelled(key.to_string()));
        }
        if self.failing.lock().contains(key) {
            return Err(StorageError::Request {
                key: key.to_string(),
                message: "injected upload failure".to_string(),
            });
        }

        self.objects.lock().insert(key.to_string(), data.to_vec());
        self.uploads.lock().push(key.to_string());
        debug!("Stored {} ({} bytes) in memory", key, data.len());
        Ok(())
    }

    async fn download(
        &self,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, StorageError> {
        if cancel.is_cancelled() {
            return Err(StorageError::Cancelled(key.to_string()));
        }
        if self.failing_downloads.lock().contains(key) {
            return Err(StorageError::Request {
                key: key.to_string(),
                message: "injected download failure".to_string(),
            });
        }
        self.get(key)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn name(&self) -> &str {
        "memory"
    }
}
