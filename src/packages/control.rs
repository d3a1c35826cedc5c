// src/packages/control.rs

//! Parser for the plain-text `control` file of a Debian package
//!
//! Only single-line `Field: value` pairs are recognised. Blank lines and
//! `#` comments are skipped, unknown fields are logged and ignored.

use crate::error::Result;
use crate::packages::common::{PackageMetadata, PackageMetadataBuilder};
use tracing::{debug, warn};

/// Parse control text into package metadata
///
/// A field that appears more than once keeps its last value. Fails with
/// `IncompleteMetadata` if Package, Version or Architecture is empty after
/// parsing.
pub fn parse_control(text: &str) -> Result<PackageMetadata> {
    let mut builder = PackageMetadataBuilder::new();

    for line in text.split('\n') {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((field, value)) = line.split_once(':') else {
            warn!("Invalid control line: {}", line);
            continue;
        };
        let field = field.trim();
        let value = value.trim();

        builder = match field {
            "Package" => builder.name(value),
            "Version" => builder.version(value),
            "Architecture" => builder.architecture(value),
            "Maintainer" => builder.maintainer(value),
            "Description" => builder.description(value),
            "Section" => builder.section(value),
            "Priority" => builder.priority(value),
            "Installed-Size" => builder.installed_size(value),
            "Depends" => builder.depends(value),
            "Recommends" => builder.recommends(value),
            "Suggests" => builder.suggests(value),
            "Conflicts" => builder.conflicts(value),
            "Provides" => builder.provides(value),
            _ => {
                warn!("Unrecognized control field: {}", field);
                continue;
            }
        };
        debug!("Parsed {}: {}", field, value);
    }

    builder.build()
}
