//! Streaming SHA-256 content digests
//!
//! Files are hashed through a fixed 64 KiB buffer so memory use does not
//! depend on artifact size. The handle is closed when `digest` returns.

use crate::error::{HarnessError, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read buffer size used for hashing and transport encoding
pub const READ_CHUNK: usize = 64 * 1024;

/// Hex SHA-256 digest of the file at `path`
pub fn digest(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| HarnessError::io(path, e))?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; READ_CHUNK];

    loop {
        let n = match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(HarnessError::io(path, e)),
        };
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Hex SHA-256 digest of an in-memory buffer
pub fn digest_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
