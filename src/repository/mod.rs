// src/repository/mod.rs

//! APT-style repository maintenance
//!
//! This module provides functionality for:
//! - Deriving pool and index paths from package metadata
//! - Rendering index stanzas and merging them into an existing index
//! - Computing checksums and rendering integrity manifests
//! - Publishing a package through a [`Storage`](crate::storage::Storage) backend

pub mod index;
pub mod manifest;
pub mod paths;
mod publish;

// Re-export main types and functions
pub use index::IndexStanza;
pub use manifest::{
    ChecksumEntry, PackageManifest, SuiteManifest, checksum_of, render_package_manifest,
    render_package_manifest_at, render_suite_manifest, render_suite_manifest_at,
};
pub use paths::{pool_path, repo_path, suite_path};
pub use publish::{PublishReport, Publisher};
