use anyhow::{Context, Result};
use clap::Parser;
use loravec::cli::{BaselineArgs, Cli, Command, Outcome, PhyArgs, ERROR_EXIT_CODE};
use loravec::compare::{self, ComparisonResult};
use loravec::config::HarnessConfig;
use loravec::generate::{self, LegacyRequest, PhyRequest, ProcessGenerator};
use loravec::impairment::Impairment;
use loravec::manifest::Manifest;
use loravec::regression::{assess_regression, PerfTable};
use loravec::transport::{self, TRANSPORT_SUFFIX};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    } else if let Ok(filter) = EnvFilter::try_from_default_env() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_config(path: Option<&Path>) -> Result<HarnessConfig> {
    match path {
        Some(path) => HarnessConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(HarnessConfig::default()),
    }
}

fn print_summary(manifest: &Manifest, dir: &Path) {
    println!(
        "Wrote {} files to {} (seed {})",
        manifest.files().len(),
        dir.display(),
        manifest.seed()
    );
}

fn run_generate_baseline(args: BaselineArgs, config: &HarnessConfig) -> Result<Outcome> {
    // Binary problems are reported before any output directory is touched
    let binary = config.legacy_binary(args.binary)?;
    let generator = ProcessGenerator::locate(&binary)?;

    let request = LegacyRequest {
        sf: args.sf,
        cr: args.cr,
        snr: args.snr,
        seed: args.seed,
        out_dir: config.legacy_root.join(&args.out),
    };
    let manifest = generate::generate_legacy(&generator, &request)?;
    print_summary(&manifest, &request.out_dir);
    Ok(Outcome::Success)
}

fn run_generate(args: PhyArgs, config: &HarnessConfig) -> Result<Outcome> {
    let binary = config.phy_binary(args.binary);
    let generator = ProcessGenerator::locate(&binary)?;

    let request = PhyRequest {
        sf: args.sf,
        seed: args.seed,
        bytes: args.bytes,
        osr: args.osr,
        bw: args.bw,
        out_dir: config.phy_root.join(&args.out),
        window: args.window,
        dumps: args.dump,
        impairment: Impairment::new(args.cfo_bins, args.time_offset),
    };
    let manifest = generate::generate_phy(&generator, &request)?;
    print_summary(&manifest, &request.out_dir);
    Ok(Outcome::Success)
}

fn report_comparison(result: &ComparisonResult) -> Outcome {
    let report = result.to_report_string();
    if result.passed() {
        print!("{}", report);
        Outcome::Success
    } else {
        eprint!("{}", report);
        Outcome::VectorMismatch
    }
}

fn run_compare_perf(baseline: &Path, candidate: &Path) -> Result<Outcome> {
    let baseline = PerfTable::from_file(baseline)?;
    let candidate = PerfTable::from_file(candidate)?;

    let verdict = assess_regression(&baseline, &candidate);
    print!("{}", verdict.to_report_string());
    Ok(if verdict.is_regression() {
        Outcome::Regression
    } else {
        Outcome::Success
    })
}

fn run_decode(input: &Path, out: Option<PathBuf>) -> Result<Outcome> {
    let out = match out {
        Some(out) => out,
        None => {
            let name = input.to_string_lossy();
            let stripped = name.strip_suffix(TRANSPORT_SUFFIX).with_context(|| {
                format!(
                    "{} has no {} suffix; pass --out",
                    input.display(),
                    TRANSPORT_SUFFIX
                )
            })?;
            PathBuf::from(stripped)
        }
    };
    let n = transport::decode_file(input, &out)?;
    println!("Decoded {} bytes to {}", n, out.display());
    Ok(Outcome::Success)
}

fn run(cli: Cli) -> Result<Outcome> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::GenerateBaseline(args) => run_generate_baseline(args, &config),
        Command::Generate(args) => run_generate(args, &config),
        Command::CompareVectors { reference, test } => {
            let result = compare::compare_dirs(&reference, &test)?;
            Ok(report_comparison(&result))
        }
        Command::VerifyManifest { dir } => {
            let result = compare::verify_manifest(&dir)?;
            Ok(report_comparison(&result))
        }
        Command::ComparePerf {
            baseline,
            candidate,
        } => run_compare_perf(&baseline, &candidate),
        Command::Decode { input, out } => run_decode(&input, out),
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { ERROR_EXIT_CODE } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    init_tracing(cli.debug);

    match run(cli) {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(ERROR_EXIT_CODE)
        }
    }
}
