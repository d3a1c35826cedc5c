// tests/extract.rs

//! Integration tests for .deb metadata extraction

mod common;

use common::{DebBuilder, ar_with};
use debforge::packages::deb;
use debforge::{DebExtractor, Error, MetadataExtractor};

#[test]
fn test_extract_full_control() {
    let control = "Package: nginx-light\n\
                   Version: 1.24.0-2\n\
                   Architecture: arm64\n\
                   Maintainer: Debian Nginx Maintainers <pkg-nginx@example.org>\n\
                   Description: small, powerful, scalable web/proxy server\n\
                   Section: httpd\n\
                   Priority: optional\n\
                   Installed-Size: 1234\n\
                   Depends: libc6 (>= 2.34), libssl3 (>= 3.0.0)\n\
                   Recommends: ssl-cert\n\
                   Suggests: nginx-doc\n\
                   Conflicts: nginx-full\n\
                   Provides: httpd, nginx\n\
                   Homepage: https://nginx.org\n";
    let package = DebBuilder::new(control).build();

    let meta = deb::extract(package.as_slice()).unwrap();
    assert_eq!(meta.name(), "nginx-light");
    assert_eq!(meta.version(), "1.24.0-2");
    assert_eq!(meta.architecture(), "arm64");
    assert_eq!(
        meta.maintainer,
        "Debian Nginx Maintainers <pkg-nginx@example.org>"
    );
    assert_eq!(meta.section, "httpd");
    assert_eq!(meta.installed_size, "1234");
    assert_eq!(meta.depends, "libc6 (>= 2.34), libssl3 (>= 3.0.0)");
    assert_eq!(meta.provides, "httpd, nginx");
}

#[test]
fn test_extract_from_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("tool_0.3.1_amd64.deb");
    std::fs::write(&path, DebBuilder::package("tool", "0.3.1", "amd64").build()).unwrap();

    let mut file = std::fs::File::open(&path).unwrap();
    let meta = DebExtractor.extract(&mut file).unwrap();
    assert_eq!(meta.deb_filename(), "tool_0.3.1_amd64.deb");
    assert!(meta.section.is_empty());
}

#[test]
fn test_trailing_members_are_ignored() {
    let package = DebBuilder::package("tool", "1", "all")
        .member("_gpgbuilder", b"signature")
        .build();
    assert_eq!(deb::extract(package.as_slice()).unwrap().name(), "tool");
}

#[test]
fn test_missing_required_field() {
    let package = DebBuilder::new("Package: tool\nArchitecture: amd64\n").build();
    let err = deb::extract(package.as_slice()).unwrap_err();
    assert!(matches!(err, Error::IncompleteMetadata(ref missing) if missing == &["Version"]));
}

#[test]
fn test_xz_control_member_is_missing_member() {
    let package = DebBuilder::package("tool", "1", "amd64")
        .control_member("control.tar.xz")
        .build();
    let err = deb::extract(package.as_slice()).unwrap_err();
    assert!(matches!(err, Error::MissingMember(_)));
}

#[test]
fn test_control_entry_without_dot_slash() {
    let package = DebBuilder::package("tool", "1", "amd64")
        .control_entry("control")
        .build();
    assert!(matches!(
        deb::extract(package.as_slice()),
        Err(Error::MissingMember(_))
    ));
}

#[test]
fn test_bad_member_header() {
    let mut package = DebBuilder::package("tool", "1", "amd64").build();
    // Terminator of the first member header
    package[8 + 58] = b'X';
    assert!(matches!(
        deb::extract(package.as_slice()),
        Err(Error::ArchiveFormat(_))
    ));
}

#[test]
fn test_truncated_package() {
    let package = DebBuilder::package("tool", "1", "amd64").build();
    // Cut inside the control.tar.gz member
    let cut = &package[..8 + 60 + 4 + 60 + 10];
    assert!(matches!(deb::extract(cut), Err(Error::ArchiveFormat(_))));
}

#[test]
fn test_archive_without_members() {
    let package = ar_with(&[]);
    assert!(matches!(
        deb::extract(package.as_slice()),
        Err(Error::MissingMember(_))
    ));
}

#[test]
fn test_wrong_magic() {
    let err = deb::extract(&b"<arch>!\nnot a package"[..]).unwrap_err();
    assert!(matches!(err, Error::ArchiveFormat(_)));
}
