// src/repository/paths.rs
//! Object keys inside the repository
//!
//! ```text
//! pool/<component>/<letter>/<name>/<name>_<version>_<arch>.deb
//! dists/<archive>/<component>/binary-<arch>/{Index,Index.gz,Manifest}
//! dists/<archive>/Manifest
//! ```

use crate::config::{Architecture, Archive, Component};
use crate::packages::PackageMetadata;

/// Flat stanza index of one component/architecture
pub const INDEX: &str = "Index";
/// Gzip-compressed copy of [`INDEX`]
pub const INDEX_GZ: &str = "Index.gz";
/// Checksum manifest
pub const MANIFEST: &str = "Manifest";

/// Key of the package artifact in the pool
///
/// Packages are bucketed by the lowercased first character of their name.
pub fn pool_path(component: Component, metadata: &PackageMetadata) -> String {
    let name = metadata.name();
    let letter: String = name.chars().take(1).flat_map(char::to_lowercase).collect();
    format!(
        "pool/{}/{}/{}/{}",
        component,
        letter,
        name,
        metadata.deb_filename()
    )
}

/// Directory of one archive/component/architecture segment
pub fn repo_path(archive: Archive, component: Component, architecture: Architecture) -> String {
    format!("dists/{archive}/{component}/binary-{architecture}")
}

/// Directory holding the suite manifest
pub fn suite_path(archive: Archive) -> String {
    format!("dists/{archive}")
}

/// `<dir>/<file>`
pub fn join(dir: &str, file: &str) -> String {
    format!("{dir}/{file}")
}

/// Path of a segment file relative to the suite directory
pub fn suite_relative(component: Component, architecture: Architecture, file: &str) -> String {
    format!("{component}/binary-{architecture}/{file}")
}
