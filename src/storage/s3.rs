// src/storage/s3.rs
//! S3-compatible object storage backend
//!
//! Works with AWS S3, Cloudflare R2, DigitalOcean Spaces and MinIO. Requests
//! use path-style addressing against a custom endpoint.

use super::{Storage, StorageError};
use crate::compression::CompressionFormat;
use async_trait::async_trait;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::{Bucket, Region};
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Default signing region for custom endpoints
pub const DEFAULT_REGION: &str = "auto";

/// Connection settings for an S3-compatible endpoint
#[derive(Clone)]
pub struct S3Config {
    /// Endpoint host (`minio.local:9000`) or full URL
    pub endpoint: String,
    pub bucket: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    /// Use https when `endpoint` has no scheme
    pub secure: bool,
}

impl std::fmt::Debug for S3Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Config")
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("secure", &self.secure)
            .finish()
    }
}

impl S3Config {
    /// Endpoint URL with scheme
    pub fn endpoint_url(&self) -> String {
        if self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://") {
            return self.endpoint.trim_end_matches('/').to_string();
        }
        let scheme = if self.secure { "https" } else { "http" };
        format!("{scheme}://{}", self.endpoint.trim_end_matches('/'))
    }
}

/// Storage in an S3-compatible bucket
pub struct S3Storage {
    bucket: Box<Bucket>,
}

impl S3Storage {
    /// Create a client for the configured bucket
    pub fn new(config: &S3Config) -> Result<Self, StorageError> {
        if config.bucket.is_empty() {
            return Err(StorageError::Init("bucket name is empty".to_string()));
        }
        if config.endpoint.is_empty() {
            return Err(StorageError::Init("endpoint is empty".to_string()));
        }

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint_url(),
        };
        let credentials = Credentials::new(
            Some(config.access_key.as_str()),
            Some(config.secret_key.as_str()),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Init(format!("Invalid credentials: {e}")))?;

        let bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| StorageError::Init(format!("Failed to create bucket client: {e}")))?
            .with_path_style();

        info!(
            "Using bucket {} at {}",
            config.bucket,
            config.endpoint_url()
        );
        Ok(Self { bucket })
    }
}

/// Content type sent with an uploaded object
fn content_type_for(key: &str) -> &'static str {
    if key.ends_with(".deb") {
        return "application/vnd.debian.binary-package";
    }
    match CompressionFormat::from_extension(key) {
        CompressionFormat::Gzip => "application/gzip",
        CompressionFormat::None => "text/plain; charset=utf-8",
    }
}

fn request_error(key: &str, err: S3Error) -> StorageError {
    match err {
        S3Error::HttpFailWithBody(404, _) => StorageError::NotFound(key.to_string()),
        S3Error::HttpFailWithBody(status, body) => StorageError::Request {
            key: key.to_string(),
            message: format!("HTTP {status}: {}", body.trim()),
        },
        other => StorageError::Request {
            key: key.to_string(),
            message: other.to_string(),
        },
    }
}

/// Run a request unless `cancel` fires first
async fn cancellable<T, F>(
    key: &str,
    cancel: &CancellationToken,
    request: F,
) -> Result<T, StorageError>
where
    F: Future<Output = Result<T, S3Error>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(StorageError::Cancelled(key.to_string())),
        result = request => result.map_err(|e| request_error(key, e)),
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn upload(
        &self,
        key: &str,
        data: &[u8],
        cancel: &CancellationToken,
    ) -> Result<(), StorageError> {
        let content_type = content_type_for(key);
        debug!("PUT {} ({} bytes, {})", key, data.len(), content_type);

        let response = cancellable(
            key,
            cancel,
            self.bucket.put_object_with_content_type(key, data, content_type),
        )
        .await?;

        match response.status_code() {
            200..=299 => Ok(()),
            status => Err(StorageError::Request {
                key: key.to_string(),
                message: format!("HTTP {status}"),
            }),
        }
    }

    async fn download(
        &self,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, StorageError> {
        debug!("GET {}", key);

        let response = cancellable(key, cancel, self.bucket.get_object(key)).await?;

        match response.status_code() {
            200..=299 => Ok(response.bytes().to_vec()),
            404 => Err(StorageError::NotFound(key.to_string())),
            status => Err(StorageError::Request {
                key: key.to_string(),
                message: format!("HTTP {status}"),
            }),
        }
    }

    fn name(&self) -> &str {
        "s3"
    }
}
