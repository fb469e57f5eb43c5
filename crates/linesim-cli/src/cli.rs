//! Command-line interface for `linesim`.

use clap::Parser;
use std::path::PathBuf;

/// Simulate orders flowing through an assembly line of stocked stations.
#[derive(Debug, Parser)]
#[command(name = "linesim", version, about)]
pub struct Cli {
    /// First station file (comma-delimited by default).
    pub stations1: PathBuf,

    /// Second station file (pipe-delimited by default).
    pub stations2: PathBuf,

    /// Customer order file.
    pub orders: PathBuf,

    /// Assembly line topology file.
    pub topology: PathBuf,

    /// Configuration file (.toml, .ron or .json).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write a JSON run report to this path.
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Give up after this many cycles.
    #[arg(long)]
    pub max_cycles: Option<u64>,

    /// Do not print per-cycle notices.
    #[arg(long, short, default_value_t = false)]
    pub quiet: bool,
}
