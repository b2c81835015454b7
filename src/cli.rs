//! CLI argument parsing for loravec

use crate::generate::{DumpStage, Window};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "loravec")]
#[command(version)]
#[command(about = "LoRa PHY vector generation and regression checks", long_about = None)]
pub struct Cli {
    /// Harness configuration file (TOML)
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug tracing output on stderr
    #[arg(long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate baseline vectors with the LoRa-SDR AWGN simulation
    GenerateBaseline(BaselineArgs),

    /// Generate vectors with the lora_phy vector dump
    Generate(PhyArgs),

    /// Compare two vector directories file by file
    CompareVectors {
        /// Reference vector directory
        reference: PathBuf,
        /// Vector directory under test
        test: PathBuf,
    },

    /// Check a vector directory against its own manifest
    VerifyManifest {
        /// Vector directory containing manifest.json
        dir: PathBuf,
    },

    /// Compare two performance CSVs for regressions
    ComparePerf {
        /// Baseline performance CSV
        baseline: PathBuf,
        /// New performance CSV
        candidate: PathBuf,
    },

    /// Decode a transport (.b64) artifact back to raw bytes
    Decode {
        /// Encoded artifact
        input: PathBuf,
        /// Output path (default: input without the .b64 suffix)
        #[arg(long = "out", value_name = "PATH")]
        out: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
pub struct BaselineArgs {
    /// Spreading factor
    #[arg(long = "sf")]
    pub sf: u32,

    /// Coding rate, e.g. 4/5
    #[arg(long = "cr")]
    pub cr: String,

    /// SNR in dB
    #[arg(long = "snr", allow_hyphen_values = true)]
    pub snr: f64,

    /// Output subdirectory name under the legacy vector root
    #[arg(long = "out")]
    pub out: String,

    /// Random seed
    #[arg(long = "seed", default_value = "0")]
    pub seed: u64,

    /// Path to the lora_awgn_sim binary
    #[arg(long = "binary", env = "LORASDR_AWGN_BIN", value_name = "PATH")]
    pub binary: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct PhyArgs {
    /// Spreading factor
    #[arg(long = "sf")]
    pub sf: u32,

    /// Random seed
    #[arg(long = "seed", default_value = "0")]
    pub seed: u64,

    /// Number of payload bytes
    #[arg(long = "bytes", default_value = "16")]
    pub bytes: u32,

    /// Oversampling ratio
    #[arg(long = "osr", default_value = "1")]
    pub osr: u32,

    /// LoRa bandwidth in Hz
    #[arg(long = "bw", default_value = "125000")]
    pub bw: u32,

    /// Output subdirectory name under the lora_phy vector root
    #[arg(long = "out")]
    pub out: String,

    /// Path to the lora_phy_vector_dump binary
    #[arg(long = "binary", env = "LORAPHY_VECTOR_BIN", value_name = "PATH")]
    pub binary: Option<PathBuf>,

    /// Carrier frequency offset in FFT bins
    #[arg(long = "cfo-bins", value_name = "BINS", allow_hyphen_values = true)]
    pub cfo_bins: Option<f64>,

    /// Timing offset in samples (rounded to the nearest sample)
    #[arg(long = "time-offset", value_name = "SAMPLES", allow_hyphen_values = true)]
    pub time_offset: Option<f64>,

    /// Analysis window to apply during demodulation
    #[arg(long = "window", value_enum, default_value = "none")]
    pub window: Window,

    /// Stages to dump (repeatable or comma separated; default all)
    #[arg(long = "dump", value_enum, value_delimiter = ',', value_name = "STAGE")]
    pub dump: Vec<DumpStage>,
}

/// How a completed command maps onto the process exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Command succeeded, nothing to report
    Success,
    /// Vector directories differ
    VectorMismatch,
    /// Performance regression detected
    Regression,
}

impl Outcome {
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Success => 0,
            Outcome::VectorMismatch => 1,
            Outcome::Regression => 2,
        }
    }
}

/// Exit status for usage, configuration and runtime errors
pub const ERROR_EXIT_CODE: u8 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_generate_defaults() {
        let cli = Cli::parse_from(["loravec", "generate", "--sf", "7", "--out", "sf7"]);
        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.sf, 7);
                assert_eq!(args.seed, 0);
                assert_eq!(args.bytes, 16);
                assert_eq!(args.osr, 1);
                assert_eq!(args.bw, 125_000);
                assert_eq!(args.window, Window::None);
                assert!(args.cfo_bins.is_none());
                assert!(args.time_offset.is_none());
                assert!(args.dump.is_empty());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_negative_offsets() {
        let cli = Cli::parse_from([
            "loravec",
            "generate",
            "--sf",
            "8",
            "--out",
            "o",
            "--cfo-bins",
            "-0.25",
            "--time-offset",
            "-3",
            "--window",
            "hann",
        ]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.cfo_bins, Some(-0.25));
        assert_eq!(args.time_offset, Some(-3.0));
        assert_eq!(args.window, Window::Hann);
    }

    #[test]
    fn test_cli_dump_stages() {
        let cli = Cli::parse_from([
            "loravec",
            "generate",
            "--sf=7",
            "--out=o",
            "--dump=iq,payload",
            "--dump",
            "pre_interleave",
        ]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(
            args.dump,
            vec![DumpStage::Iq, DumpStage::Payload, DumpStage::PreInterleave]
        );
    }

    #[test]
    fn test_cli_rejects_unknown_window() {
        assert!(Cli::try_parse_from([
            "loravec", "generate", "--sf=7", "--out=o", "--window=blackman"
        ])
        .is_err());
    }

    #[test]
    fn test_cli_baseline_requires_cr_and_snr() {
        assert!(Cli::try_parse_from(["loravec", "generate-baseline", "--sf=7", "--out=o"]).is_err());

        let cli = Cli::parse_from([
            "loravec",
            "generate-baseline",
            "--sf=7",
            "--cr=4/5",
            "--snr",
            "-5.5",
            "--out=o",
            "--binary=/bin/true",
        ]);
        let Command::GenerateBaseline(args) = cli.command else {
            panic!("expected generate-baseline");
        };
        assert_eq!(args.snr, -5.5);
        assert_eq!(args.binary, Some(PathBuf::from("/bin/true")));
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["loravec", "compare-vectors", "a", "b", "--debug"]);
        assert!(cli.debug);
        assert!(matches!(cli.command, Command::CompareVectors { .. }));
    }

    #[test]
    fn test_outcome_exit_codes() {
        assert_eq!(Outcome::Success.exit_code(), 0);
        assert_eq!(Outcome::VectorMismatch.exit_code(), 1);
        assert_eq!(Outcome::Regression.exit_code(), 2);
    }
}
