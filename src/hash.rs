// src/hash.rs

//! SHA-256 hashing for repository integrity manifests
//!
//! APT-style manifests list a SHA-256 digest for every index artifact. Digests
//! are always rendered as lowercase hex, 64 characters long.

use sha2::{Digest, Sha256};
use std::io::{self, Read};

/// Length of a SHA-256 digest rendered as hex
pub const SHA256_HEX_LEN: usize = 64;

/// Compute SHA-256 of a byte slice as lowercase hex
#[inline]
pub fn sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Compute SHA-256 of everything a reader yields
///
/// Returns the hex digest and the number of bytes consumed, so callers can
/// pair the size with the digest of the very same stream.
pub fn sha256_reader<R: Read>(reader: &mut R) -> io::Result<(String, u64)> {
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    let mut total = 0u64;

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
        total += n as u64;
    }

    Ok((format!("{:x}", hasher.finalize()), total))
}
