//! Error taxonomy for the vector harness
//!
//! Configuration, external-process and I/O failures are fatal for the
//! invocation that hits them. Integrity findings (mismatched vectors,
//! performance regressions) are NOT errors: they are returned as values by
//! [`crate::compare`] and [`crate::regression`] so that every discrepancy is
//! reported in one run.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the harness library
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Generator binary not found: {}", .0.display())]
    BinaryNotFound(PathBuf),

    #[error("Generator {} exited with {status}", program.display())]
    GeneratorFailed { program: PathBuf, status: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File name is not valid UTF-8: {}", .0.display())]
    InvalidFileName(PathBuf),

    #[error("Invalid manifest: {0}")]
    Manifest(String),

    #[error("Invalid transport encoding: {0}")]
    Transport(String),

    #[error("Invalid IQ sample file at line {line}: {reason}")]
    IqFormat { line: usize, reason: String },

    #[error("Invalid performance CSV at line {line}: {reason}")]
    PerfCsv { line: usize, reason: String },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl HarnessError {
    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HarnessError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;
