// src/repository/index.rs
//! Stanza index of one repository segment
//!
//! The index is plain text: one stanza per package, stanzas separated by a
//! blank line. A stanza is regenerated from [`PackageMetadata`] every time,
//! so the same metadata always renders to the same bytes.

use crate::compression::{self, CompressionFormat};
use crate::error::Result;
use crate::packages::PackageMetadata;
use std::fmt;

/// Rendered index entry for one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStanza(String);

impl IndexStanza {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for IndexStanza {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IndexStanza {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Render the stanza for `metadata`
///
/// Package, Version, Architecture, Maintainer and Description are always
/// written; the remaining fields only when non-empty.
pub fn render(metadata: &PackageMetadata) -> IndexStanza {
    let mut out = String::with_capacity(256);
    let mut field = |name: &str, value: &str| {
        out.push_str(name);
        out.push_str(": ");
        out.push_str(value);
        out.push('\n');
    };

    field("Package", metadata.name());
    field("Version", metadata.version());
    field("Architecture", metadata.architecture());
    field("Maintainer", &metadata.maintainer);
    field("Description", &metadata.description);

    let optional = [
        ("Section", &metadata.section),
        ("Priority", &metadata.priority),
        ("Installed-Size", &metadata.installed_size),
        ("Depends", &metadata.depends),
        ("Recommends", &metadata.recommends),
        ("Suggests", &metadata.suggests),
        ("Conflicts", &metadata.conflicts),
        ("Provides", &metadata.provides),
    ];
    for (name, value) in optional {
        if !value.is_empty() {
            field(name, value);
        }
    }

    IndexStanza(out)
}

/// Add `stanza` to an existing index
///
/// If the index already contains the stanza text verbatim it is returned
/// unchanged. This is a plain substring test: a stanza that happens to be a
/// prefix of a longer stanza for the same package (for example one with
/// extra trailing fields) is treated as present.
pub fn merge(existing: &str, stanza: &IndexStanza) -> String {
    if existing.contains(stanza.as_str()) {
        return existing.to_string();
    }

    let mut merged = String::with_capacity(existing.len() + stanza.0.len() + 1);
    merged.push_str(existing);
    if !existing.is_empty() {
        merged.push('\n');
    }
    merged.push_str(stanza.as_str());
    merged
}

/// Gzip the index text
pub fn compress(text: &str) -> Result<Vec<u8>> {
    Ok(compression::compress(text.as_bytes(), CompressionFormat::Gzip)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packages::PackageMetadataBuilder;

    fn hello() -> PackageMetadata {
        PackageMetadataBuilder::new()
            .name("hello")
            .version("2.10-3")
            .architecture("amd64")
            .maintainer("Jane <jane@example.com>")
            .description("greeter")
            .section("utils")
            .depends("libc6 (>= 2.34)")
            .build()
            .unwrap()
    }

    #[test]
    fn test_render_field_order() {
        assert_eq!(
            render(&hello()).as_str(),
            "Package: hello\n\
             Version: 2.10-3\n\
             Architecture: amd64\n\
             Maintainer: Jane <jane@example.com>\n\
             Description: greeter\n\
             Section: utils\n\
             Depends: libc6 (>= 2.34)\n"
        );
    }

    #[test]
    fn test_render_keeps_empty_required_lines() {
        let meta = PackageMetadata::new("a", "1", "all").unwrap();
        assert_eq!(
            render(&meta).as_str(),
            "Package: a\nVersion: 1\nArchitecture: all\nMaintainer: \nDescription: \n"
        );
    }

    #[test]
    fn test_render_is_deterministic() {
        let meta = hello();
        assert_eq!(render(&meta), render(&meta));
        assert_eq!(render(&meta).as_str(), render(&hello()).as_str());
    }

    #[test]
    fn test_merge_into_empty() {
        let stanza = render(&hello());
        assert_eq!(merge("", &stanza), stanza.as_str());
    }

    #[test]
    fn test_merge_appends_with_blank_line() {
        let other = render(&PackageMetadata::new("other", "1", "amd64").unwrap());
        let stanza = render(&hello());

        let merged = merge(other.as_str(), &stanza);
        assert_eq!(merged, format!("{}\n{}", other, stanza));
        assert!(merged.contains("Description: \n\nPackage: hello\n"));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let stanza = render(&hello());
        for existing in ["", "Package: z\nVersion: 9\n", "garbage"] {
            let once = merge(existing, &stanza);
            let twice = merge(&once, &stanza);
            assert_eq!(once, twice);
            assert_eq!(twice.matches(stanza.as_str()).count(), 1);
        }
    }

    #[test]
    fn test_new_version_is_appended() {
        let old = render(&hello());
        let newer = PackageMetadata::new("hello", "2.10-4", "amd64").unwrap();
        let merged = merge(old.as_str(), &render(&newer));
        assert!(merged.contains("Version: 2.10-3\n"));
        assert!(merged.contains("Version: 2.10-4\n"));
    }

    #[test]
    fn test_compress_round_trip() {
        let text = merge("", &render(&hello()));
        let gz = compress(&text).unwrap();
        assert_eq!(CompressionFormat::from_magic_bytes(&gz), CompressionFormat::Gzip);
        let plain = compression::decompress(&gz, CompressionFormat::Gzip).unwrap();
        assert_eq!(plain, text.as_bytes());
    }
}
