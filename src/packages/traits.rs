// src/packages/traits.rs

//! Common traits for package format parsers

use crate::error::Result;
use crate::packages::common::PackageMetadata;
use std::io::Read;

/// Extracts control metadata from a package stream
///
/// Implementations either return complete metadata or fail; they never hand
/// back partially populated values.
pub trait MetadataExtractor: Send + Sync {
    /// Read the package from `reader` and return its metadata
    fn extract(&self, reader: &mut dyn Read) -> Result<PackageMetadata>;

    /// Human-readable format name (for logging)
    fn format_name(&self) -> &'static str;
}
