//! Measurement release → HepData submission converter.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod convert;
mod manifest;

/// Environment variable naming the root of the measurement data tree.
const DATA_ROOT_VAR: &str = "NUISANCE_DATA_ROOT";

#[derive(Parser)]
#[command(name = "hd-convert")]
#[command(about = "Convert a binned measurement release into a HepData submission package")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: tracing::Level,

    /// Probe segment of the release path (e.g. "nu")
    #[arg(long)]
    probe: String,

    /// Experiment segment (e.g. "MicroBooNE")
    #[arg(long)]
    experiment: String,

    /// Target segment (e.g. "Ar")
    #[arg(long)]
    target: String,

    /// Probe species segment (e.g. "numu")
    #[arg(long)]
    species: String,

    /// Reference-id segment (e.g. "arxiv.2310.06082")
    #[arg(long)]
    reference: String,

    /// Output directory for the submission package
    #[arg(short, long, default_value = "testout")]
    output: PathBuf,

    /// Keep a pre-existing output directory instead of removing it
    #[arg(long)]
    keep_old: bool,
}

fn main() {
    let cli = Cli::parse();
    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    let root = match std::env::var(DATA_ROOT_VAR) {
        Ok(v) if !v.is_empty() => PathBuf::from(v),
        _ => {
            eprintln!("[ERROR]: {DATA_ROOT_VAR} is not set.");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&cli, &root) {
        eprintln!("[ERROR]: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli, root: &std::path::Path) -> Result<()> {
    let release_dir = root
        .join(&cli.probe)
        .join(&cli.experiment)
        .join(&cli.target)
        .join(&cli.species)
        .join(&cli.reference);

    tracing::info!(dir = %release_dir.display(), "converting release");
    convert::cmd_convert(&release_dir, &cli.output, !cli.keep_old)
}
