// src/repository/manifest.rs
//! Integrity manifests for index artifacts
//!
//! Two manifests are written on every publish: one per
//! archive/component/architecture segment, listing that segment's `Index`
//! and `Index.gz`, and one per suite listing the index artifacts of every
//! configured segment.

use crate::config::{Architecture, Archive, Component, RepoConfig};
use crate::error::{Error, Result};
use crate::hash::sha256_reader;
use chrono::{DateTime, Utc};
use std::fmt::{self, Write as _};

/// Manifest `Date:` format
pub const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S UTC";

/// Digest, size and name of one artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumEntry {
    /// SHA-256, lowercase hex
    pub sha256: String,
    pub size: u64,
    pub filename: String,
}

impl fmt::Display for ChecksumEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " {} {} {}", self.sha256, self.size, self.filename)
    }
}

/// Checksum the exact bytes that are stored under `filename`
pub fn checksum_of(data: &[u8], filename: impl Into<String>) -> Result<ChecksumEntry> {
    let filename = filename.into();
    let (sha256, size) = sha256_reader(&mut &data[..])
        .map_err(|e| Error::Checksum(format!("{filename}: {e}")))?;

    if size != data.len() as u64 {
        return Err(Error::Checksum(format!(
            "{filename}: hashed {size} of {} bytes",
            data.len()
        )));
    }

    Ok(ChecksumEntry {
        sha256,
        size,
        filename,
    })
}

fn write_checksums(out: &mut fmt::Formatter<'_>, checksums: &[ChecksumEntry]) -> fmt::Result {
    writeln!(out, "SHA256:")?;
    for entry in checksums {
        writeln!(out, "{entry}")?;
    }
    Ok(())
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    let mut joined = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            joined.push(' ');
        }
        let _ = write!(joined, "{item}");
    }
    joined
}

/// Manifest of one archive/component/architecture segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManifest {
    pub origin: String,
    pub label: String,
    pub suite: Archive,
    pub component: Component,
    pub architecture: Architecture,
    pub date: DateTime<Utc>,
    /// Entries in the order they are listed
    pub checksums: Vec<ChecksumEntry>,
}

impl PackageManifest {
    pub fn new(config: &RepoConfig, checksums: Vec<ChecksumEntry>, date: DateTime<Utc>) -> Self {
        Self {
            origin: config.origin.clone(),
            label: config.label.clone(),
            suite: config.archive,
            component: config.component,
            architecture: config.architecture,
            date,
            checksums,
        }
    }
}

impl fmt::Display for PackageManifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Origin: {}", self.origin)?;
        writeln!(f, "Label: {}", self.label)?;
        writeln!(f, "Suite: {}", self.suite)?;
        writeln!(f, "Component: {}", self.component)?;
        writeln!(f, "Architecture: {}", self.architecture)?;
        writeln!(f, "Date: {}", self.date.format(DATE_FORMAT))?;
        // MD5 digests are not listed
        writeln!(f, "MD5Sum:")?;
        write_checksums(f, &self.checksums)
    }
}

/// Suite-level manifest aggregating every segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteManifest {
    pub origin: String,
    pub label: String,
    pub suite: Archive,
    pub architectures: Vec<Architecture>,
    pub components: Vec<Component>,
    pub date: DateTime<Utc>,
    /// Entries relative to `dists/<suite>/`
    pub checksums: Vec<ChecksumEntry>,
}

impl SuiteManifest {
    pub fn new(
        config: &RepoConfig,
        architectures: &[Architecture],
        components: &[Component],
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            origin: config.origin.clone(),
            label: config.label.clone(),
            suite: config.archive,
            architectures: architectures.to_vec(),
            components: components.to_vec(),
            date,
            checksums: Vec::new(),
        }
    }

    pub fn with_checksums(mut self, checksums: Vec<ChecksumEntry>) -> Self {
        self.checksums = checksums;
        self
    }
}

impl fmt::Display for SuiteManifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Origin: {}", self.origin)?;
        writeln!(f, "Label: {}", self.label)?;
        writeln!(f, "Suite: {}", self.suite)?;
        writeln!(f, "Codename: {}", self.suite)?;
        writeln!(f, "Architectures: {}", join(&self.architectures))?;
        writeln!(f, "Components: {}", join(&self.components))?;
        writeln!(f, "Date: {}", self.date.format(DATE_FORMAT))?;
        write_checksums(f, &self.checksums)
    }
}

/// Render the segment manifest stamped with the current time
pub fn render_package_manifest(config: &RepoConfig, checksums: &[ChecksumEntry]) -> String {
    render_package_manifest_at(config, checksums, Utc::now())
}

pub fn render_package_manifest_at(
    config: &RepoConfig,
    checksums: &[ChecksumEntry],
    date: DateTime<Utc>,
) -> String {
    PackageManifest::new(config, checksums.to_vec(), date).to_string()
}

/// Render the suite manifest stamped with the current time
pub fn render_suite_manifest(
    config: &RepoConfig,
    architectures: &[Architecture],
    components: &[Component],
) -> String {
    render_suite_manifest_at(config, architectures, components, Utc::now())
}

pub fn render_suite_manifest_at(
    config: &RepoConfig,
    architectures: &[Architecture],
    components: &[Component],
    date: DateTime<Utc>,
) -> String {
    SuiteManifest::new(config, architectures, components, date).to_string()
}
