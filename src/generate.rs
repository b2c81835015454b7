//! Vector generation drivers
//!
//! A driver invokes an external generator with one parameter set, optionally
//! impairs the produced IQ capture, replaces every output file by its
//! transport-encoded form, and records the encoded digests in a manifest.
//!
//! The generator is an injected [`Generator`] so the bookkeeping can be
//! exercised without the real PHY binaries. Any failure aborts the run
//! before a manifest is written.

use crate::checksum;
use crate::error::{HarnessError, Result};
use crate::impairment::{self, Impairment};
use crate::iq;
use crate::manifest::{FileRecord, Manifest, ParameterSet, MANIFEST_NAME};
use crate::transport::{self, RawArtifact, TRANSPORT_SUFFIX};
use clap::ValueEnum;
use std::path::{Path, PathBuf};
use std::process::Command;

/// IQ capture written by the vector dump
pub const IQ_FILE: &str = "iq_samples.csv";

/// Impaired copy of [`IQ_FILE`]
pub const IQ_OFFSET_FILE: &str = "iq_samples_offset.csv";

/// Bandwidths accepted by the vector dump, in Hz
pub const SUPPORTED_BANDWIDTHS: [u32; 3] = [125_000, 250_000, 500_000];

/// Coding rates accepted by the AWGN simulation
pub const SUPPORTED_CODING_RATES: [&str; 4] = ["4/5", "4/6", "4/7", "4/8"];

/// Synchronous external capability that writes vector files
pub trait Generator {
    /// Run to completion; a non-zero exit is an error
    fn run(&self, args: &[String]) -> Result<()>;
}

/// Generator backed by a subprocess
#[derive(Debug, Clone)]
pub struct ProcessGenerator {
    program: PathBuf,
}

impl ProcessGenerator {
    /// Resolve `path` to an existing executable file
    pub fn locate(path: &Path) -> Result<Self> {
        let program = path
            .canonicalize()
            .map_err(|_| HarnessError::BinaryNotFound(path.to_path_buf()))?;
        if !program.is_file() {
            return Err(HarnessError::BinaryNotFound(program));
        }
        Ok(Self { program })
    }
}

impl Generator for ProcessGenerator {
    fn run(&self, args: &[String]) -> Result<()> {
        tracing::info!("[run] {} {}", self.program.display(), args.join(" "));
        let status = Command::new(&self.program)
            .args(args)
            .status()
            .map_err(|e| HarnessError::io(&self.program, e))?;

        if !status.success() {
            return Err(HarnessError::GeneratorFailed {
                program: self.program.clone(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

/// Analysis window applied by the demodulator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Window {
    /// Rectangular (no window)
    #[default]
    None,
    /// Hann window
    Hann,
}

/// Pipeline stage the vector dump can write
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DumpStage {
    #[value(name = "payload")]
    Payload,
    #[value(name = "pre_interleave")]
    PreInterleave,
    #[value(name = "post_interleave")]
    PostInterleave,
    #[value(name = "iq")]
    Iq,
    #[value(name = "demod")]
    Demod,
    #[value(name = "deinterleave")]
    Deinterleave,
    #[value(name = "decoded")]
    Decoded,
}

impl DumpStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            DumpStage::Payload => "payload",
            DumpStage::PreInterleave => "pre_interleave",
            DumpStage::PostInterleave => "post_interleave",
            DumpStage::Iq => "iq",
            DumpStage::Demod => "demod",
            DumpStage::Deinterleave => "deinterleave",
            DumpStage::Decoded => "decoded",
        }
    }
}

/// One run of the LoRa-SDR AWGN simulation
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyRequest {
    pub sf: u32,
    pub cr: String,
    pub snr: f64,
    pub seed: u64,
    pub out_dir: PathBuf,
}

impl LegacyRequest {
    pub fn validate(&self) -> Result<()> {
        impairment::symbol_len(self.sf, 1)?;
        if !SUPPORTED_CODING_RATES.contains(&self.cr.as_str()) {
            return Err(HarnessError::InvalidParameter(format!(
                "coding rate must be one of {}, got {}",
                SUPPORTED_CODING_RATES.join(", "),
                self.cr
            )));
        }
        if !self.snr.is_finite() {
            return Err(HarnessError::InvalidParameter(format!(
                "snr must be finite, got {}",
                self.snr
            )));
        }
        Ok(())
    }

    /// Command-line arguments for the simulation binary
    pub fn args(&self) -> Vec<String> {
        vec![
            format!("--sf={}", self.sf),
            format!("--cr={}", self.cr),
            format!("--snr={}", iq::format_float(self.snr)),
            format!("--seed={}", self.seed),
            format!("--out={}", self.out_dir.display()),
        ]
    }

    pub fn parameters(&self) -> ParameterSet {
        ParameterSet::Legacy {
            sf: self.sf,
            cr: self.cr.clone(),
            snr: self.snr,
        }
    }
}

/// One run of the `lora_phy` vector dump
#[derive(Debug, Clone, PartialEq)]
pub struct PhyRequest {
    pub sf: u32,
    pub seed: u64,
    pub bytes: u32,
    pub osr: u32,
    pub bw: u32,
    pub out_dir: PathBuf,
    pub window: Window,
    /// Stages to dump; empty means every stage
    pub dumps: Vec<DumpStage>,
    pub impairment: Impairment,
}

impl PhyRequest {
    pub fn validate(&self) -> Result<()> {
        impairment::symbol_len(self.sf, self.osr)?;
        if !SUPPORTED_BANDWIDTHS.contains(&self.bw) {
            return Err(HarnessError::InvalidParameter(format!(
                "unsupported bandwidth: {}",
                self.bw
            )));
        }
        self.impairment.validate()
    }

    /// Command-line arguments for the vector dump binary
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            format!("--sf={}", self.sf),
            format!("--seed={}", self.seed),
            format!("--bytes={}", self.bytes),
            format!("--out={}", self.out_dir.display()),
            format!("--osr={}", self.osr),
            format!("--bw={}", self.bw),
        ];
        if self.window == Window::Hann {
            args.push("--window=hann".to_string());
        }
        args.extend(self.dumps.iter().map(|d| format!("--dump={}", d.as_str())));
        args
    }

    pub fn parameters(&self) -> ParameterSet {
        ParameterSet::Phy {
            sf: self.sf,
            bytes: self.bytes,
            osr: self.osr,
            bw: self.bw,
        }
    }
}

/// Generate a legacy vector set and write its manifest
pub fn generate_legacy(generator: &dyn Generator, request: &LegacyRequest) -> Result<Manifest> {
    request.validate()?;
    prepare_out_dir(&request.out_dir)?;

    generator.run(&request.args())?;

    finish(&request.out_dir, request.parameters(), request.seed)
}

/// Generate a `lora_phy` vector set, impair its IQ capture, write its manifest
pub fn generate_phy(generator: &dyn Generator, request: &PhyRequest) -> Result<Manifest> {
    request.validate()?;
    prepare_out_dir(&request.out_dir)?;

    generator.run(&request.args())?;

    if !request.impairment.is_identity() {
        write_impaired_iq(request)?;
    }

    finish(&request.out_dir, request.parameters(), request.seed)
}

fn write_impaired_iq(request: &PhyRequest) -> Result<()> {
    let iq_path = request.out_dir.join(IQ_FILE);
    if !iq_path.is_file() {
        tracing::warn!(
            "Offsets requested but {} was not generated; skipping impairment",
            iq_path.display()
        );
        return Ok(());
    }

    let samples = iq::read_iq(&iq_path)?;
    let n = impairment::symbol_len(request.sf, request.osr)?;
    let impaired = impairment::inject(&samples, n, &request.impairment)?;

    let out_path = request.out_dir.join(IQ_OFFSET_FILE);
    iq::write_iq(&out_path, &impaired)?;
    tracing::info!(
        "Wrote {} samples to {} (cfo_bins={}, shift={})",
        impaired.len(),
        out_path.display(),
        request.impairment.cfo(),
        request.impairment.shift_samples()
    );
    Ok(())
}

/// Create the output directory and clear artifacts of a previous run
fn prepare_out_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| HarnessError::io(dir, e))?;

    for path in list_files(dir)? {
        let name = file_name(&path);
        if name == MANIFEST_NAME || name.ends_with(TRANSPORT_SUFFIX) {
            tracing::debug!("Removing stale artifact {}", path.display());
            std::fs::remove_file(&path).map_err(|e| HarnessError::io(&path, e))?;
        }
    }
    Ok(())
}

/// Encode every output file, digest the encoded forms, write the manifest
fn finish(dir: &Path, parameters: ParameterSet, seed: u64) -> Result<Manifest> {
    let mut records = Vec::new();
    for path in list_files(dir)? {
        let name = file_name(&path);
        if name == MANIFEST_NAME || name.ends_with(TRANSPORT_SUFFIX) {
            continue;
        }
        let encoded = transport::encode_file(RawArtifact::new(path))?;
        let sha256 = checksum::digest(encoded.path())?;
        records.push(FileRecord::new(encoded.name(), sha256));
    }

    let manifest = Manifest::build(parameters, seed, records)?;
    manifest.write_to(dir)?;
    tracing::info!(
        "Wrote {} with {} files",
        dir.join(MANIFEST_NAME).display(),
        manifest.files().len()
    );
    Ok(manifest)
}

/// Regular files in `dir`, sorted by path
fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| HarnessError::io(dir, e))? {
        let path = entry.map_err(|e| HarnessError::io(dir, e))?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
