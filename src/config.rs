// src/config.rs
//! Repository configuration
//!
//! Architectures, archives and components are closed sets: they are parsed
//! and validated here, at the CLI/config-file boundary, and the rest of the
//! crate works with the typed values.
//!
//! Configuration file (TOML), every key optional:
//!
//! ```toml
//! [repository]
//! origin = "Custom Repository"
//! label = "Custom Repo"
//! archive = "stable"
//! component = "main"
//! architecture = "amd64"
//! architectures = ["amd64", "arm64"]   # listed in the suite manifest
//! components = ["main", "contrib"]
//!
//! [storage]
//! endpoint = "fra1.digitaloceanspaces.com"
//! bucket = "apt"
//! region = "auto"
//! secure = true
//! # local_root = "/srv/apt"              # publish into a directory instead
//! ```

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

pub const DEFAULT_ORIGIN: &str = "Custom Repository";
pub const DEFAULT_LABEL: &str = "Custom Repo";

/// Debian architecture of a repository segment
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, AsRefStr, EnumIter,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(try_from = "String")]
pub enum Architecture {
    #[default]
    Amd64,
    Arm64,
    Armel,
    Armhf,
    I386,
    Mips64el,
    Ppc64el,
    Riscv64,
    S390x,
    /// Architecture-independent packages
    All,
}

/// Release channel (suite) of the repository
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, AsRefStr, EnumIter,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(try_from = "String")]
pub enum Archive {
    Oldstable,
    #[default]
    Stable,
    Testing,
    Unstable,
    Experimental,
}

/// Repository component
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, AsRefStr, EnumIter,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(try_from = "String")]
pub enum Component {
    #[default]
    Main,
    Contrib,
    NonFree,
    NonFreeFirmware,
    Restricted,
    Universe,
    Multiverse,
}

/// Parse one value of a closed set, listing the accepted values on failure
pub fn parse_choice<T>(kind: &str, value: &str) -> std::result::Result<T, String>
where
    T: FromStr + IntoEnumIterator + std::fmt::Display,
{
    value.trim().parse().map_err(|_| {
        let accepted: Vec<String> = T::iter().map(|v| v.to_string()).collect();
        format!("unknown {kind} '{value}' (expected one of: {})", accepted.join(", "))
    })
}

impl TryFrom<String> for Architecture {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        parse_choice("architecture", &value)
    }
}

impl TryFrom<String> for Archive {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        parse_choice("archive", &value)
    }
}

impl TryFrom<String> for Component {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        parse_choice("component", &value)
    }
}

/// Resolved repository settings for one publish run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoConfig {
    pub origin: String,
    pub label: String,
    pub archive: Archive,
    pub component: Component,
    pub architecture: Architecture,
    /// Architectures listed in the suite manifest
    pub architectures: Vec<Architecture>,
    /// Components listed in the suite manifest
    pub components: Vec<Component>,
}

impl Default for RepoConfig {
    fn default() -> Self {
        RepositorySection::default().into_config()
    }
}

impl RepoConfig {
    /// Suite architectures, always including the one being published
    pub fn suite_architectures(&self) -> Vec<Architecture> {
        with_current(&self.architectures, self.architecture)
    }

    /// Suite components, always including the one being published
    pub fn suite_components(&self) -> Vec<Component> {
        with_current(&self.components, self.component)
    }
}

fn with_current<T: Copy + PartialEq>(listed: &[T], current: T) -> Vec<T> {
    let mut all = Vec::with_capacity(listed.len() + 1);
    for item in listed {
        if !all.contains(item) {
            all.push(*item);
        }
    }
    if !all.contains(&current) {
        all.push(current);
    }
    all
}

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Repository settings
    #[serde(default)]
    pub repository: RepositorySection,

    /// Storage settings
    #[serde(default)]
    pub storage: StorageSection,
}

/// `[repository]` section
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositorySection {
    pub origin: Option<String>,
    pub label: Option<String>,
    pub archive: Option<Archive>,
    pub component: Option<Component>,
    pub architecture: Option<Architecture>,
    #[serde(default)]
    pub architectures: Vec<Architecture>,
    #[serde(default)]
    pub components: Vec<Component>,
}

impl RepositorySection {
    /// Fill unset values with defaults
    pub fn into_config(self) -> RepoConfig {
        RepoConfig {
            origin: self.origin.unwrap_or_else(|| DEFAULT_ORIGIN.to_string()),
            label: self.label.unwrap_or_else(|| DEFAULT_LABEL.to_string()),
            archive: self.archive.unwrap_or_default(),
            component: self.component.unwrap_or_default(),
            architecture: self.architecture.unwrap_or_default(),
            architectures: self.architectures,
            components: self.components,
        }
    }
}

/// `[storage]` section
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageSection {
    /// S3-compatible endpoint host or URL
    pub endpoint: Option<String>,
    pub bucket: Option<String>,
    /// Signing region (default "auto")
    pub region: Option<String>,
    /// Use https for a bare endpoint host (default true)
    pub secure: Option<bool>,
    /// Publish into this directory instead of an object store
    pub local_root: Option<PathBuf>,
}

impl ConfigFile {
    /// Load and parse a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_names() {
        assert_eq!(Architecture::Amd64.to_string(), "amd64");
        assert_eq!(Architecture::S390x.as_ref(), "s390x");
        assert_eq!(Archive::Stable.to_string(), "stable");
        assert_eq!(Component::NonFree.to_string(), "non-free");
        assert_eq!(Component::NonFreeFirmware.to_string(), "non-free-firmware");
        assert_eq!("arm64".parse::<Architecture>().unwrap(), Architecture::Arm64);
        assert_eq!("contrib".parse::<Component>().unwrap(), Component::Contrib);
    }

    #[test]
    fn test_parse_choice_lists_values() {
        let err = parse_choice::<Architecture>("architecture", "sparc").unwrap_err();
        assert!(err.contains("unknown architecture 'sparc'"));
        assert!(err.contains("amd64, arm64"));
    }

    #[test]
    fn test_defaults() {
        let config = RepoConfig::default();
        assert_eq!(config.origin, "Custom Repository");
        assert_eq!(config.label, "Custom Repo");
        assert_eq!(config.archive, Archive::Stable);
        assert_eq!(config.component, Component::Main);
        assert_eq!(config.architecture, Architecture::Amd64);
        assert_eq!(config.suite_architectures(), vec![Architecture::Amd64]);
        assert_eq!(config.suite_components(), vec![Component::Main]);
    }

    #[test]
    fn test_suite_lists_keep_order_and_include_current() {
        let config = RepoConfig {
            architecture: Architecture::Riscv64,
            architectures: vec![Architecture::Arm64, Architecture::Amd64, Architecture::Arm64],
            ..RepoConfig::default()
        };
        assert_eq!(
            config.suite_architectures(),
            vec![Architecture::Arm64, Architecture::Amd64, Architecture::Riscv64]
        );
    }

    #[test]
    fn test_parse_file() {
        let file = ConfigFile::parse(
            r#"
[repository]
origin = "Acme"
archive = "testing"
component = "non-free"
architectures = ["amd64", "arm64"]

[storage]
endpoint = "minio.local:9000"
bucket = "apt"
secure = false
"#,
        )
        .unwrap();

        let config = file.repository.into_config();
        assert_eq!(config.origin, "Acme");
        assert_eq!(config.label, DEFAULT_LABEL);
        assert_eq!(config.archive, Archive::Testing);
        assert_eq!(config.component, Component::NonFree);
        assert_eq!(config.architectures, vec![Architecture::Amd64, Architecture::Arm64]);
        assert_eq!(file.storage.bucket.as_deref(), Some("apt"));
        assert_eq!(file.storage.secure, Some(false));
    }

    #[test]
    fn test_parse_file_rejects_unknown_values() {
        let err = ConfigFile::parse("[repository]\narchitecture = \"vax\"\n").unwrap_err();
        assert!(err.to_string().contains("unknown architecture 'vax'"));

        let err = ConfigFile::parse("[repository]\nsuite = \"stable\"\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
