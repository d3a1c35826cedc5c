// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;

/// Builds .deb archives in memory.
pub struct DebBuilder {
    control: String,
    control_entry: String,
    control_member: String,
    extra_members: Vec<(String, Vec<u8>)>,
}

impl DebBuilder {
    /// A package with the given control text.
    pub fn new(control: &str) -> Self {
        Self {
            control: control.to_string(),
            control_entry: "./control".to_string(),
            control_member: "control.tar.gz".to_string(),
            extra_members: Vec::new(),
        }
    }

    /// A minimal valid package.
    pub fn package(name: &str, version: &str, arch: &str) -> Self {
        Self::new(&format!(
            "Package: {name}\nVersion: {version}\nArchitecture: {arch}\n\
             Maintainer: Test <test@example.com>\nDescription: test package {name}\n"
        ))
    }

    /// Store the control file under a different tar entry name.
    pub fn control_entry(mut self, name: &str) -> Self {
        self.control_entry = name.to_string();
        self
    }

    /// Store the control archive under a different ar member name.
    pub fn control_member(mut self, name: &str) -> Self {
        self.control_member = name.to_string();
        self
    }

    /// Append another ar member after the control archive.
    pub fn member(mut self, name: &str, content: &[u8]) -> Self {
        self.extra_members.push((name.to_string(), content.to_vec()));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let control_tar = tar_with(&[
            ("./", &b""[..]),
            (self.control_entry.as_str(), self.control.as_bytes()),
            ("./md5sums", &b"d41d8cd98f00b204e9800998ecf8427e  usr/bin/tool\n"[..]),
        ]);

        let mut members = vec![
            ("debian-binary".to_string(), b"2.0\n".to_vec()),
            (self.control_member.clone(), gzip(&control_tar)),
            ("data.tar.gz".to_string(), gzip(&tar_with(&[("./usr/bin/tool", &b"binary"[..])]))),
        ];
        members.extend(self.extra_members.iter().cloned());
        ar_with(&members)
    }
}

/// Tar archive whose entry names are written verbatim.
pub fn tar_with(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (path, content) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        let name = header.as_old_mut().name.as_mut();
        name[..path.len()].copy_from_slice(path.as_bytes());
        header.set_cksum();
        builder.append(&header, *content).unwrap();
    }
    builder.into_inner().unwrap()
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// ar archive with the global magic and padded members.
pub fn ar_with(members: &[(String, Vec<u8>)]) -> Vec<u8> {
    let mut out = b"!<arch>\n".to_vec();
    for (name, content) in members {
        let header = format!(
            "{:<16}{:<12}{:<6}{:<6}{:<8o}{:<10}`\n",
            name,
            1_700_000_000,
            0,
            0,
            0o100644,
            content.len()
        );
        assert_eq!(header.len(), 60);
        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(content);
        if content.len() % 2 == 1 {
            out.push(b'\n');
        }
    }
    out
}
