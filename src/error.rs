// src/error.rs

//! Error types for debforge

use crate::compression::CompressionError;
use crate::storage::StorageError;
use thiserror::Error;

/// Result type alias using debforge's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while extracting packages and maintaining the repository
#[derive(Error, Debug)]
pub enum Error {
    /// Outer ar container, control.tar.gz or its tar stream is malformed
    #[error("Malformed package archive: {0}")]
    ArchiveFormat(String),

    /// A required archive member was not found before the end of the stream
    #[error("Archive member not found: {0}")]
    MissingMember(String),

    /// Package, Version or Architecture missing from the control file
    #[error("Incomplete control metadata: missing {}", .0.join(", "))]
    IncompleteMetadata(Vec<&'static str>),

    /// Object store failure
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Hashing fault while computing an index checksum
    #[error("Checksum computation failed: {0}")]
    Checksum(String),

    #[error(transparent)]
    Compression(#[from] CompressionError),

    /// Invalid repository or storage configuration
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error wraps a storage not-found outcome
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_not_found())
    }
}
