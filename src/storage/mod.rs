// src/storage/mod.rs
//! Object storage for repository artifacts
//!
//! The publisher only needs two operations: put an object and get an object,
//! where a missing object is reported as [`StorageError::NotFound`] rather
//! than a generic failure. Backends:
//! - [`S3Storage`]: S3-compatible object stores (R2, Spaces, MinIO)
//! - [`LocalStorage`]: a directory on the local filesystem
//! - [`MemoryStorage`]: in-process map, used by tests
//!
//! Every call takes a [`CancellationToken`]; a cancelled call fails with
//! [`StorageError::Cancelled`] and nothing is retried.

mod local;
mod memory;
mod s3;

pub use local::LocalStorage;
pub use memory::MemoryStorage;
pub use s3::{DEFAULT_REGION, S3Config, S3Storage};

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors reported by storage backends
#[derive(Error, Debug)]
pub enum StorageError {
    /// The object does not exist
    #[error("Object not found: {0}")]
    NotFound(String),

    /// The backend rejected or failed the request
    #[error("Storage request for {key} failed: {message}")]
    Request { key: String, message: String },

    /// The caller cancelled the operation
    #[error("Storage operation on {0} was cancelled")]
    Cancelled(String),

    #[error("I/O error on {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The backend could not be constructed
    #[error("Storage initialization failed: {0}")]
    Init(String),
}

impl StorageError {
    /// Whether this is the distinguishable "object does not exist" outcome
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Key/value object store holding the repository
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under `key`, replacing any existing object
    async fn upload(
        &self,
        key: &str,
        data: &[u8],
        cancel: &CancellationToken,
    ) -> Result<(), StorageError>;

    /// Fetch the object stored under `key`
    ///
    /// Returns [`StorageError::NotFound`] if there is no such object.
    async fn download(&self, key: &str, cancel: &CancellationToken)
    -> Result<Vec<u8>, StorageError>;

    /// Human-readable backend name (for logging)
    fn name(&self) -> &str;
}
