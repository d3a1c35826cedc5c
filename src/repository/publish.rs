// src/repository/publish.rs
//! Publishing a package into the repository
//!
//! One publish is a fixed sequence of storage calls:
//!
//! 1. upload the package to its pool path
//! 2. download the segment `Index` (missing means empty)
//! 3. merge the package stanza and upload `Index`
//! 4. upload the gzip copy `Index.gz`
//! 5. upload the segment `Manifest`
//! 6. rebuild and upload the suite `Manifest`
//!
//! The read-modify-write of the index is not atomic. Two publishers writing
//! the same segment at the same time can lose one of the appends, so only a
//! single writer per repository is supported. Any failed call aborts the run
//! without undoing earlier uploads.

use crate::config::RepoConfig;
use crate::error::{Error, Result};
use crate::packages::{MetadataExtractor, PackageMetadata};
use crate::repository::index::{self, IndexStanza};
use crate::repository::manifest::{ChecksumEntry, PackageManifest, SuiteManifest, checksum_of};
use crate::repository::paths::{
    INDEX, INDEX_GZ, MANIFEST, join, pool_path, repo_path, suite_path, suite_relative,
};
use crate::storage::{Storage, StorageError};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// What a publish run wrote
#[derive(Debug, Clone)]
pub struct PublishReport {
    pub metadata: PackageMetadata,
    pub stanza: IndexStanza,
    /// Key of the uploaded package
    pub pool_path: String,
    /// Segment directory (`dists/<archive>/<component>/binary-<arch>`)
    pub repo_path: String,
    /// False when the index already contained the stanza
    pub index_changed: bool,
    /// Checksums listed in the segment manifest
    pub checksums: Vec<ChecksumEntry>,
    /// Key of the suite manifest
    pub suite_manifest: String,
    /// Number of artifacts listed in the suite manifest
    pub suite_entries: usize,
}

/// Publishes packages into one archive/component/architecture segment
pub struct Publisher {
    storage: Arc<dyn Storage>,
    extractor: Arc<dyn MetadataExtractor>,
    config: RepoConfig,
}

impl Publisher {
    pub fn new(
        storage: Arc<dyn Storage>,
        extractor: Arc<dyn MetadataExtractor>,
        config: RepoConfig,
    ) -> Self {
        Self {
            storage,
            extractor,
            config,
        }
    }

    /// Publish `package`, stamping manifests with the current time
    pub async fn publish(
        &self,
        package: &[u8],
        cancel: &CancellationToken,
    ) -> Result<PublishReport> {
        self.publish_at(package, cancel, Utc::now()).await
    }

    /// Publish `package`, stamping manifests with `date`
    pub async fn publish_at(
        &self,
        package: &[u8],
        cancel: &CancellationToken,
        date: DateTime<Utc>,
    ) -> Result<PublishReport> {
        let config = &self.config;

        let metadata = self.extractor.extract(&mut &package[..])?;
        info!(
            "Extracted {} {} ({}) from {} package",
            metadata.name(),
            metadata.version(),
            metadata.architecture(),
            self.extractor.format_name()
        );
        if metadata.architecture() != config.architecture.as_ref()
            && metadata.architecture() != "all"
        {
            warn!(
                "Package architecture {} differs from target architecture {}",
                metadata.architecture(),
                config.architecture
            );
        }

        let pool_path = pool_path(config.component, &metadata);
        self.upload(&pool_path, package, cancel).await?;

        let repo_path = repo_path(config.archive, config.component, config.architecture);
        let index_key = join(&repo_path, INDEX);
        let existing = self.download_index(&index_key, cancel).await?;

        let stanza = index::render(&metadata);
        let merged = index::merge(&existing, &stanza);
        let index_changed = merged != existing;
        if index_changed {
            info!("Adding {} to {}", metadata.name(), index_key);
        } else {
            info!("{} already lists {} {}", index_key, metadata.name(), metadata.version());
        }

        self.upload(&index_key, merged.as_bytes(), cancel).await?;
        let index_entry = checksum_of(merged.as_bytes(), INDEX)?;

        let compressed = index::compress(&merged)?;
        self.upload(&join(&repo_path, INDEX_GZ), &compressed, cancel)
            .await?;
        let compressed_entry = checksum_of(&compressed, INDEX_GZ)?;

        let checksums = vec![index_entry, compressed_entry];
        let manifest = PackageManifest::new(config, checksums.clone(), date).to_string();
        self.upload(&join(&repo_path, MANIFEST), manifest.as_bytes(), cancel)
            .await?;

        let suite_checksums = self
            .suite_checksums(merged.as_bytes(), &compressed, cancel)
            .await?;
        let suite_entries = suite_checksums.len();
        let suite_manifest = SuiteManifest::new(
            config,
            &config.suite_architectures(),
            &config.suite_components(),
            date,
        )
        .with_checksums(suite_checksums)
        .to_string();
        let suite_manifest_key = join(&suite_path(config.archive), MANIFEST);
        self.upload(&suite_manifest_key, suite_manifest.as_bytes(), cancel)
            .await?;

        info!(
            "Published {} to {} ({} artifacts in suite manifest)",
            pool_path, repo_path, suite_entries
        );

        Ok(PublishReport {
            metadata,
            stanza,
            pool_path,
            repo_path,
            index_changed,
            checksums,
            suite_manifest: suite_manifest_key,
            suite_entries,
        })
    }

    async fn upload(&self, key: &str, data: &[u8], cancel: &CancellationToken) -> Result<()> {
        debug!("Uploading {} ({} bytes) via {}", key, data.len(), self.storage.name());
        self.storage.upload(key, data, cancel).await?;
        Ok(())
    }

    /// Current index text, empty if the index does not exist yet
    async fn download_index(&self, key: &str, cancel: &CancellationToken) -> Result<String> {
        match self.storage.download(key, cancel).await {
            Ok(data) => String::from_utf8(data).map_err(|_| {
                Error::Storage(StorageError::Request {
                    key: key.to_string(),
                    message: "existing index is not valid UTF-8".to_string(),
                })
            }),
            Err(e) if e.is_not_found() => {
                info!("No index at {}, starting a new one", key);
                Ok(String::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Checksums of every index artifact in the suite
    ///
    /// The segment being published contributes the bytes that were just
    /// uploaded; other segments are read back from storage and skipped when
    /// they do not exist.
    async fn suite_checksums(
        &self,
        index: &[u8],
        compressed: &[u8],
        cancel: &CancellationToken,
    ) -> Result<Vec<ChecksumEntry>> {
        let config = &self.config;
        let mut entries = Vec::new();

        for component in config.suite_components() {
            for architecture in config.suite_architectures() {
                let current =
                    component == config.component && architecture == config.architecture;
                let dir = repo_path(config.archive, component, architecture);

                for (file, uploaded) in [(INDEX, index), (INDEX_GZ, compressed)] {
                    let name = suite_relative(component, architecture, file);
                    if current {
                        entries.push(checksum_of(uploaded, name)?);
                        continue;
                    }

                    match self.storage.download(&join(&dir, file), cancel).await {
                        Ok(data) => entries.push(checksum_of(&data, name)?),
                        Err(e) if e.is_not_found() => {
                            debug!("Skipping {}: not published", name);
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
            }
        }

        Ok(entries)
    }
}
