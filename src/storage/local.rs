// src/storage/local.rs
//! Local directory storage backend
//!
//! Publishes the repository tree into a directory, for serving with any
//! static web server or for staging before a sync.

use super::{Storage, StorageError};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Storage rooted at a local directory
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Map an object key onto a path under the root
    fn object_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(key.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if key.is_empty() || escapes {
            return Err(StorageError::Request {
                key: key.to_string(),
                message: "key is not a relative path inside the repository".to_string(),
            });
        }
        Ok(self.root.join(relative))
    }

    /// `<path>.tmp`, next to the final object
    fn temp_path(path: &Path) -> PathBuf {
        let mut temp_name = path.as_os_str().to_owned();
        temp_name.push(".tmp");
        PathBuf::from(temp_name)
    }

    async fn write_object(
        path: &Path,
        temp_path: &Path,
        key: &str,
        data: &[u8],
    ) -> Result<(), StorageError> {
        let io_error = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }

        // Write atomically via temp file
        tokio::fs::write(temp_path, data).await.map_err(io_error)?;
        tokio::fs::rename(temp_path, path).await.map_err(io_error)
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload(
        &self,
        key: &str,
        data: &[u8],
        cancel: &CancellationToken,
    ) -> Result<(), StorageError> {
        let path = self.object_path(key)?;
        let temp_path = Self::temp_path(&path);

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(StorageError::Cancelled(key.to_string())),
            result = Self::write_object(&path, &temp_path, key, data) => result,
        };

        if let Err(e) = result {
            match tokio::fs::remove_file(&temp_path).await {
                Ok(()) => debug!("Removed partial write {}", temp_path.display()),
                Err(rm) if rm.kind() == std::io::ErrorKind::NotFound => {}
                Err(rm) => warn!("Failed to remove {}: {}", temp_path.display(), rm),
            }
            return Err(e);
        }

        debug!("Wrote {} ({} bytes)", path.display(), data.len());
        Ok(())
    }

    async fn download(
        &self,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, StorageError> {
        let path = self.object_path(key)?;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(StorageError::Cancelled(key.to_string())),
            result = tokio::fs::read(&path) => match result {
                Ok(data) => Ok(data),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    Err(StorageError::NotFound(key.to_string()))
                }
                Err(source) => Err(StorageError::Io {
                    key: key.to_string(),
                    source,
                }),
            },
        }
    }

    fn name(&self) -> &str {
        "local"
    }
}
