//! Base64 transport form for binary vector artifacts
//!
//! Generated artifacts are stored base64-encoded so they can live in text
//! oriented version control next to their manifest. The wire form is
//! MIME-style: standard alphabet, `=` padding, 57 raw bytes (76 characters)
//! per line, every line terminated by `\n`. Vector directories recorded
//! before this crate existed use exactly this layout, so their digests stay
//! valid.
//!
//! The raw-to-transport handoff is modelled as ownership transfer:
//! [`encode_file`] consumes a [`RawArtifact`], deletes the raw file, and
//! returns the [`TransportArtifact`] that replaces it.

use crate::checksum::READ_CHUNK;
use crate::error::{HarnessError, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Raw bytes encoded per output line
pub const LINE_BYTES: usize = 57;

/// Suffix appended to the raw file name
pub const TRANSPORT_SUFFIX: &str = ".b64";

/// Encode `raw` into the line-wrapped transport form
pub fn encode(raw: &[u8]) -> Vec<u8> {
    let lines = raw.len().div_ceil(LINE_BYTES);
    let mut out = Vec::with_capacity(lines * 77);
    for chunk in raw.chunks(LINE_BYTES) {
        push_line(&mut out, chunk);
    }
    out
}

/// Decode transport bytes back into the raw artifact
///
/// Line breaks and other ASCII whitespace are ignored.
pub fn decode(text: &[u8]) -> Result<Vec<u8>> {
    let compact: Vec<u8> = text
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    BASE64
        .decode(&compact)
        .map_err(|e| HarnessError::Transport(e.to_string()))
}

fn push_line(out: &mut Vec<u8>, chunk: &[u8]) {
    out.extend_from_slice(BASE64.encode(chunk).as_bytes());
    out.push(b'\n');
}

/// A freshly generated artifact in its original binary form
#[derive(Debug)]
pub struct RawArtifact {
    path: PathBuf,
}

impl RawArtifact {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// The encoded artifact that replaces a [`RawArtifact`] on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportArtifact {
    path: PathBuf,
}

impl TransportArtifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name as recorded in the manifest
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Path of the transport file for `raw`: the suffix is appended, not swapped
pub fn transport_path(raw: &Path) -> PathBuf {
    let mut name = OsString::from(raw.as_os_str());
    name.push(TRANSPORT_SUFFIX);
    PathBuf::from(name)
}

/// Encode a raw artifact to `<name>.b64` and delete the raw file
pub fn encode_file(raw: RawArtifact) -> Result<TransportArtifact> {
    let src_path = raw.path;
    let dst_path = transport_path(&src_path);

    {
        let mut src = File::open(&src_path).map_err(|e| HarnessError::io(&src_path, e))?;
        let dst = File::create(&dst_path).map_err(|e| HarnessError::io(&dst_path, e))?;
        let mut writer = BufWriter::new(dst);

        // Whole lines per read so no line straddles two chunks
        let mut buf = vec![0u8; (READ_CHUNK / LINE_BYTES) * LINE_BYTES];
        let mut line = Vec::with_capacity(77);
        loop {
            let n = read_full(&mut src, &mut buf).map_err(|e| HarnessError::io(&src_path, e))?;
            if n == 0 {
                break;
            }
            for chunk in buf[..n].chunks(LINE_BYTES) {
                line.clear();
                push_line(&mut line, chunk);
                writer
                    .write_all(&line)
                    .map_err(|e| HarnessError::io(&dst_path, e))?;
            }
            if n < buf.len() {
                break;
            }
        }
        writer.flush().map_err(|e| HarnessError::io(&dst_path, e))?;
    }

    std::fs::remove_file(&src_path).map_err(|e| HarnessError::io(&src_path, e))?;
    tracing::debug!(
        "Encoded {} -> {}",
        src_path.display(),
        dst_path.display()
    );

    Ok(TransportArtifact { path: dst_path })
}

/// Decode a transport file into `out`
pub fn decode_file(path: &Path, out: &Path) -> Result<usize> {
    let text = std::fs::read(path).map_err(|e| HarnessError::io(path, e))?;
    let raw = decode(&text)?;
    std::fs::write(out, &raw).map_err(|e| HarnessError::io(out, e))?;
    Ok(raw.len())
}

/// Fill `buf` unless EOF comes first; returns the byte count read
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
