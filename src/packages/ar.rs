// src/packages/ar.rs

//! Reader for the common `ar` archive format used as the outer .deb container
//!
//! Layout: the global magic `!<arch>\n`, then for every member a 60-byte ASCII
//! header followed by the member content, padded to an even offset with one
//! filler byte.

use crate::error::{Error, Result};
use std::io::{self, Read};

/// Global archive magic
pub const AR_MAGIC: &[u8; 8] = b"!<arch>\n";
/// Member header size
const HEADER_SIZE: usize = 60;
/// Header terminator (bytes 58..60)
const HEADER_END: &[u8; 2] = b"`\n";

/// Parsed member header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArHeader {
    pub name: String,
    pub mtime: u64,
    pub uid: u32,
    pub gid: u32,
    pub mode: u32,
    pub size: u64,
}

impl ArHeader {
    /// Parse a raw 60-byte header
    fn parse(buf: &[u8; HEADER_SIZE]) -> Result<Self> {
        if &buf[58..60] != HEADER_END {
            return Err(Error::ArchiveFormat(format!(
                "invalid ar header terminator: {:?}",
                String::from_utf8_lossy(&buf[58..60])
            )));
        }

        // GNU ar terminates names with '/'
        let raw_name = header_field(buf, 0, 16, "name")?;
        let name = raw_name.strip_suffix('/').unwrap_or(raw_name).to_string();

        let mtime = parse_number(header_field(buf, 16, 12, "mtime")?, 10, "mtime")?;
        let uid = parse_number(header_field(buf, 28, 6, "uid")?, 10, "uid")? as u32;
        let gid = parse_number(header_field(buf, 34, 6, "gid")?, 10, "gid")? as u32;
        let mode = parse_number(header_field(buf, 40, 8, "mode")?, 8, "mode")? as u32;

        let size_field = header_field(buf, 48, 10, "size")?;
        if size_field.is_empty() {
            return Err(Error::ArchiveFormat(format!("ar member '{name}' has no size")));
        }
        let size = parse_number(size_field, 10, "size")?;

        Ok(Self {
            name,
            mtime,
            uid,
            gid,
            mode,
            size,
        })
    }
}

/// Slice one header field as text with trailing padding removed
fn header_field<'a>(buf: &'a [u8; HEADER_SIZE], start: usize, len: usize, what: &str) -> Result<&'a str> {
    std::str::from_utf8(&buf[start..start + len])
        .map(str::trim_end)
        .map_err(|_| Error::ArchiveFormat(format!("non-ASCII ar header {what} field")))
}

/// Parse a space-padded numeric header field; blank counts as zero
fn parse_number(field: &str, radix: u32, what: &str) -> Result<u64> {
    let field = field.trim();
    if field.is_empty() {
        return Ok(0);
    }
    // from_str_radix alone would accept a leading '+'
    if !field.chars().all(|c| c.is_digit(radix)) {
        return Err(Error::ArchiveFormat(format!(
            "invalid ar header {what} field: {field:?}"
        )));
    }
    u64::from_str_radix(field, radix)
        .map_err(|_| Error::ArchiveFormat(format!("invalid ar header {what} field: {field:?}")))
}

/// Sequential reader over the members of an ar archive
///
/// Call [`ArReader::next_header`] to advance; the content of the current member
/// can then be read with [`ArReader::read_content`]. Unread content is skipped
/// automatically on the next advance.
pub struct ArReader<R: Read> {
    reader: R,
    /// Content bytes of the current member not yet consumed
    remaining: u64,
    /// Whether the current member is followed by a padding byte
    padded: bool,
}

impl<R: Read> ArReader<R> {
    /// Wrap a reader, verifying the global magic
    pub fn new(mut reader: R) -> Result<Self> {
        let mut magic = [0u8; 8];
        reader.read_exact(&mut magic).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                Error::ArchiveFormat("stream too short for ar magic".to_string())
            } else {
                Error::Io(e)
            }
        })?;
        if &magic != AR_MAGIC {
            return Err(Error::ArchiveFormat(format!(
                "invalid ar magic: {:?}",
                String::from_utf8_lossy(&magic)
            )));
        }

        Ok(Self {
            reader,
            remaining: 0,
            padded: false,
        })
    }

    /// Advance to the next member header
    ///
    /// Returns `Ok(None)` on a clean end of archive (no bytes at a header
    /// boundary). A partial header is an error.
    pub fn next_header(&mut self) -> Result<Option<ArHeader>> {
        self.skip_rest()?;

        let mut buf = [0u8; HEADER_SIZE];
        let filled = read_full(&mut self.reader, &mut buf)?;
        if filled == 0 {
            return Ok(None);
        }
        if filled < HEADER_SIZE {
            return Err(Error::ArchiveFormat(format!(
                "truncated ar header: expected {HEADER_SIZE} bytes, got {filled}"
            )));
        }

        let header = ArHeader::parse(&buf)?;
        self.remaining = header.size;
        self.padded = header.size % 2 == 1;
        Ok(Some(header))
    }

    /// Read the full content of the current member
    pub fn read_content(&mut self) -> Result<Vec<u8>> {
        let expected = self.remaining;
        let mut content = Vec::with_capacity(expected.min(16 * 1024 * 1024) as usize);
        let got = (&mut self.reader)
            .take(expected)
            .read_to_end(&mut content)? as u64;
        self.remaining = 0;

        if got != expected {
            return Err(Error::ArchiveFormat(format!(
                "premature end of ar member: expected {expected} bytes, got {got}"
            )));
        }
        Ok(content)
    }

    /// Discard unread content and the padding byte of the current member
    fn skip_rest(&mut self) -> Result<()> {
        if self.remaining > 0 {
            let expected = self.remaining;
            let skipped = io::copy(&mut (&mut self.reader).take(expected), &mut io::sink())?;
            self.remaining = 0;
            if skipped != expected {
                return Err(Error::ArchiveFormat(format!(
                    "premature end of ar member: expected {expected} bytes, got {skipped}"
                )));
            }
        }

        if self.padded {
            self.padded = false;
            // A missing pad byte after the last member is tolerated
            let mut pad = [0u8; 1];
            read_full(&mut self.reader, &mut pad)?;
        }
        Ok(())
    }
}

/// Read until `buf` is full or the stream ends, returning the bytes read
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(name: &str, size: usize) -> Vec<u8> {
        let h = format!(
            "{:<16}{:<12}{:<6}{:<6}{:<8o}{:<10}`\n",
            name, 1700000000, 0, 0, 0o100644, size
        );
        assert_eq!(h.len(), HEADER_SIZE);
        h.into_bytes()
    }

    fn archive(members: &[(&str, &[u8])]) -> Vec<u8> {
        let mut out = AR_MAGIC.to_vec();
        for (name, content) in members {
            out.extend(header(name, content.len()));
            out.extend_from_slice(content);
            if content.len() % 2 == 1 {
                out.push(b'\n');
            }
        }
        out
    }

    #[test]
    fn test_reads_members_in_order() {
        let data = archive(&[("debian-binary", &b"2.0\n"[..]), ("odd", &b"abc"[..]), ("last", &b"xy"[..])]);
        let mut reader = ArReader::new(data.as_slice()).unwrap();

        let first = reader.next_header().unwrap().unwrap();
        assert_eq!(first.name, "debian-binary");
        assert_eq!(first.size, 4);
        assert_eq!(first.mode, 0o100644);
        assert_eq!(first.mtime, 1700000000);
        assert_eq!(reader.read_content().unwrap(), b"2.0\n");

        // Skip "odd" without reading it; padding must be consumed too
        assert_eq!(reader.next_header().unwrap().unwrap().name, "odd");
        let last = reader.next_header().unwrap().unwrap();
        assert_eq!(last.name, "last");
        assert_eq!(reader.read_content().unwrap(), b"xy");

        assert!(reader.next_header().unwrap().is_none());
    }

    #[test]
    fn test_gnu_name_suffix_stripped() {
        let data = archive(&[("control.tar.gz/", &b"zz"[..])]);
        let mut reader = ArReader::new(data.as_slice()).unwrap();
        assert_eq!(reader.next_header().unwrap().unwrap().name, "control.tar.gz");
    }

    #[test]
    fn test_bad_magic() {
        let err = ArReader::new(&b"this is not a valid .deb file"[..]).err().unwrap();
        assert!(matches!(err, Error::ArchiveFormat(_)));
    }

    #[test]
    fn test_short_stream() {
        let err = ArReader::new(&b"!<ar"[..]).err().unwrap();
        assert!(matches!(err, Error::ArchiveFormat(_)));
    }

    #[test]
    fn test_bad_terminator() {
        let mut data = archive(&[("member", &b"ab"[..])]);
        data[8 + 58] = b'X';
        let mut reader = ArReader::new(data.as_slice()).unwrap();
        assert!(matches!(reader.next_header(), Err(Error::ArchiveFormat(_))));
    }

    #[test]
    fn test_non_numeric_size() {
        let mut data = archive(&[("member", &b"ab"[..])]);
        data[8 + 48] = b'z';
        let mut reader = ArReader::new(data.as_slice()).unwrap();
        assert!(matches!(reader.next_header(), Err(Error::ArchiveFormat(_))));
    }

    #[test]
    fn test_signed_size_rejected() {
        let mut data = archive(&[("member", &b"ab"[..])]);
        data[8 + 48] = b'+';
        data[8 + 49] = b'2';
        let mut reader = ArReader::new(data.as_slice()).unwrap();
        let err = reader.next_header().unwrap_err();
        assert!(err.to_string().contains("size field: \"+2\""));
    }

    #[test]
    fn test_non_octal_mode_rejected() {
        let mut data = archive(&[("member", &b"ab"[..])]);
        // Mode field holds "100644"; 9 is not an octal digit
        data[8 + 40] = b'9';
        let mut reader = ArReader::new(data.as_slice()).unwrap();
        assert!(matches!(reader.next_header(), Err(Error::ArchiveFormat(_))));
    }

    #[test]
    fn test_truncated_header() {
        let mut data = archive(&[("member", &b"ab"[..])]);
        data.truncate(8 + 30);
        let mut reader = ArReader::new(data.as_slice()).unwrap();
        assert!(matches!(reader.next_header(), Err(Error::ArchiveFormat(_))));
    }

    #[test]
    fn test_truncated_content() {
        let mut data = archive(&[("member", &b"abcdef"[..])]);
        data.truncate(data.len() - 3);
        let mut reader = ArReader::new(data.as_slice()).unwrap();
        reader.next_header().unwrap().unwrap();
        let err = reader.read_content().unwrap_err();
        assert!(err.to_string().contains("expected 6 bytes, got 3"));
    }

    #[test]
    fn test_truncated_skipped_member() {
        let mut data = archive(&[("big", &b"abcdefgh"[..])]);
        data.truncate(data.len() - 2);
        let mut reader = ArReader::new(data.as_slice()).unwrap();
        reader.next_header().unwrap().unwrap();
        assert!(matches!(reader.next_header(), Err(Error::ArchiveFormat(_))));
    }
}
