// src/lib.rs

//! debforge: publish Debian packages into an APT-style repository
//!
//! A `.deb` is read without unpacking it: the outer `ar` container is walked
//! to `control.tar.gz`, and the `./control` file inside it is parsed into
//! [`PackageMetadata`]. The package is then published into an object store:
//!
//! - the artifact goes to `pool/<component>/<letter>/<name>/`
//! - its stanza is merged into `dists/<archive>/<component>/binary-<arch>/Index`
//! - `Index.gz` and a SHA-256 `Manifest` are rewritten next to it
//! - the suite `Manifest` in `dists/<archive>/` is rebuilt
//!
//! Publishing the same package again leaves the index unchanged.

pub mod compression;
pub mod config;
mod error;
pub mod hash;
pub mod packages;
pub mod repository;
pub mod storage;

pub use config::{Architecture, Archive, Component, RepoConfig};
pub use error::{Error, Result};
pub use packages::{DebExtractor, MetadataExtractor, PackageMetadata, PackageMetadataBuilder};
pub use repository::{ChecksumEntry, IndexStanza, PublishReport, Publisher};
pub use storage::{LocalStorage, MemoryStorage, S3Config, S3Storage, Storage, StorageError};
