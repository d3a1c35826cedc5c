// src/packages/common.rs
//! Package metadata extracted from a .deb control file
//!
//! `PackageMetadata` always carries a non-empty name, version and
//! architecture: the only ways to obtain one are the control parser and
//! [`PackageMetadataBuilder::build`], and both validate those fields.

use crate::error::{Error, Result};

/// One package's control facts
///
/// Optional fields that were absent from the control file are empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    name: String,
    version: String,
    architecture: String,
    /// Maintainer (required by the format, may be empty)
    pub maintainer: String,
    /// First line of the description (required by the format, may be empty)
    pub description: String,
    pub section: String,
    pub priority: String,
    pub installed_size: String,
    pub depends: String,
    pub recommends: String,
    pub suggests: String,
    pub conflicts: String,
    pub provides: String,
}

impl PackageMetadata {
    /// Create metadata with only the required fields set
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        architecture: impl Into<String>,
    ) -> Result<Self> {
        PackageMetadataBuilder::new()
            .name(name)
            .version(version)
            .architecture(architecture)
            .build()
    }

    /// Package name (`Package:` field)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Package version
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Package architecture (e.g., "amd64", "all")
    pub fn architecture(&self) -> &str {
        &self.architecture
    }

    /// Canonical .deb file name: `<name>_<version>_<arch>.deb`
    pub fn deb_filename(&self) -> String {
        format!("{}_{}_{}.deb", self.name, self.version, self.architecture)
    }
}

/// Builder for PackageMetadata, validating required fields on build
#[derive(Debug, Default, Clone)]
pub struct PackageMetadataBuilder {
    name: String,
    version: String,
    architecture: String,
    maintainer: String,
    description: String,
    section: String,
    priority: String,
    installed_size: String,
    depends: String,
    recommends: String,
    suggests: String,
    conflicts: String,
    provides: String,
}

impl PackageMetadataBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn architecture(mut self, arch: impl Into<String>) -> Self {
        self.architecture = arch.into();
        self
    }

    pub fn maintainer(mut self, maintainer: impl Into<String>) -> Self {
        self.maintainer = maintainer.into();
        self
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn section(mut self, section: impl Into<String>) -> Self {
        self.section = section.into();
        self
    }

    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }

    pub fn installed_size(mut self, size: impl Into<String>) -> Self {
        self.installed_size = size.into();
        self
    }

    pub fn depends(mut self, depends: impl Into<String>) -> Self {
        self.depends = depends.into();
        self
    }

    pub fn recommends(mut self, recommends: impl Into<String>) -> Self {
        self.recommends = recommends.into();
        self
    }

    pub fn suggests(mut self, suggests: impl Into<String>) -> Self {
        self.suggests = suggests.into();
        self
    }

    pub fn conflicts(mut self, conflicts: impl Into<String>) -> Self {
        self.conflicts = conflicts.into();
        self
    }

    pub fn provides(mut self, provides: impl Into<String>) -> Self {
        self.provides = provides.into();
        self
    }

    /// Build the PackageMetadata
    ///
    /// Fails with `IncompleteMetadata` listing every required field that is
    /// empty.
    pub fn build(self) -> Result<PackageMetadata> {
        let mut missing = Vec::new();
        if self.name.is_empty() {
            missing.push("Package");
        }
        if self.version.is_empty() {
            missing.push("Version");
        }
        if self.architecture.is_empty() {
            missing.push("Architecture");
        }
        if !missing.is_empty() {
            return Err(Error::IncompleteMetadata(missing));
        }

        Ok(PackageMetadata {
            name: self.name,
            version: self.version,
            architecture: self.architecture,
            maintainer: self.maintainer,
            description: self.description,
            section: self.section,
            priority: self.priority,
            installed_size: self.installed_size,
            depends: self.depends,
            recommends: self.recommends,
            suggests: self.suggests,
            conflicts: self.conflicts,
            provides: self.provides,
        })
    }
}
