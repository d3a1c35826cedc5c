// src/packages/deb.rs

//! DEB package metadata extraction
//!
//! A .deb is an ar archive holding:
//! - debian-binary: version string "2.0\n"
//! - control.tar.gz: package metadata and scripts
//! - data.tar.*: actual file contents
//!
//! Only `./control` inside `control.tar.gz` is read; the data member is
//! streamed past without being buffered.

use crate::compression::CompressionFormat;
use crate::error::{Error, Result};
use crate::packages::ar::ArReader;
use crate::packages::common::PackageMetadata;
use crate::packages::control::parse_control;
use crate::packages::traits::MetadataExtractor;
use flate2::read::GzDecoder;
use std::io::Read;
use tracing::debug;

/// Name of the ar member holding the control archive
pub const CONTROL_MEMBER: &str = "control.tar.gz";
/// Path of the control file inside the control archive
pub const CONTROL_ENTRY: &str = "./control";

/// Extract control metadata from a .deb stream
pub fn extract<R: Read>(reader: R) -> Result<PackageMetadata> {
    debug!("Starting extraction from .deb archive");
    let mut archive = ArReader::new(reader)?;

    let control_tar_gz = loop {
        let Some(header) = archive.next_header()? else {
            return Err(Error::MissingMember(CONTROL_MEMBER.to_string()));
        };
        debug!("Found member in .deb archive: {} ({} bytes)", header.name, header.size);

        if header.name == CONTROL_MEMBER {
            break archive.read_content()?;
        }
    };

    if CompressionFormat::from_magic_bytes(&control_tar_gz) != CompressionFormat::Gzip {
        return Err(Error::ArchiveFormat(format!(
            "{CONTROL_MEMBER} does not start with gzip magic"
        )));
    }
    debug!(
        "Reading {} ({} bytes compressed)",
        CONTROL_MEMBER,
        control_tar_gz.len()
    );

    let control_text = read_control_entry(GzDecoder::new(&control_tar_gz[..]))?;
    parse_control(&control_text)
}

/// Find `./control` in a tar stream and return its text
///
/// Gzip faults in the underlying stream surface as tar read errors.
fn read_control_entry<R: Read>(tar_stream: R) -> Result<String> {
    let tar_error = |e: std::io::Error| Error::ArchiveFormat(format!("{CONTROL_MEMBER}: {e}"));

    let mut archive = tar::Archive::new(tar_stream);
    for entry in archive.entries().map_err(tar_error)? {
        let mut entry = entry.map_err(tar_error)?;
        let is_control = &*entry.path_bytes() == CONTROL_ENTRY.as_bytes();
        debug!(
            "Found entry in {}: {}",
            CONTROL_MEMBER,
            String::from_utf8_lossy(&entry.path_bytes())
        );
        if !is_control {
            continue;
        }

        let expected = entry.size();
        debug!("Control file expected size: {} bytes", expected);

        let mut data = Vec::with_capacity(expected.min(1024 * 1024) as usize);
        entry.read_to_end(&mut data).map_err(tar_error)?;
        if data.len() as u64 != expected {
            return Err(Error::ArchiveFormat(format!(
                "control file size mismatch: expected {} bytes, got {} bytes",
                expected,
                data.len()
            )));
        }

        return String::from_utf8(data)
            .map_err(|_| Error::ArchiveFormat("control file is not valid UTF-8".to_string()));
    }

    Err(Error::MissingMember(format!("{CONTROL_MEMBER}:{CONTROL_ENTRY}")))
}

/// [`MetadataExtractor`] for .deb packages
#[derive(Debug, Default, Clone, Copy)]
pub struct DebExtractor;

impl MetadataExtractor for DebExtractor {
    fn extract(&self, reader: &mut dyn Read) -> Result<PackageMetadata> {
        extract(reader)
    }

    fn format_name(&self) -> &'static str {
        "deb"
    }
}
