use std::path::PathBuf;

use addrcache_crypto::ChecksumAlgorithm;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "addrcache",
    about = "Address metadata cache: lookup keys and validated cache entries",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file with `stale_threshold_secs` and `algorithm`
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the checksum algorithm (md5, blake3)
    #[arg(long, global = true)]
    pub algorithm: Option<ChecksumAlgorithm>,

    /// Override the staleness threshold in seconds
    #[arg(long, global = true)]
    pub stale_threshold_secs: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Derive the lookup key for an address
    Key(KeyArgs),
    /// Wrap a payload file into a cache entry
    Wrap(WrapArgs),
    /// Validate a wrapped cache entry
    Inspect(InspectArgs),
    /// Show the effective validation config
    Config,
}

#[derive(Args)]
pub struct KeyArgs {
    /// Region code, e.g. US
    #[arg(long)]
    pub country: String,
    #[arg(long, default_value = "")]
    pub admin_area: String,
    #[arg(long, default_value = "")]
    pub locality: String,
    #[arg(long, default_value = "")]
    pub dependent_locality: String,
    /// Maximum number of levels to render
    #[arg(long, default_value = "4")]
    pub depth: usize,
}

#[derive(Args)]
pub struct WrapArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Write time in seconds since epoch (defaults to now)
    #[arg(long)]
    pub timestamp: Option<u64>,
}

#[derive(Args)]
pub struct InspectArgs {
    pub input: PathBuf,
    /// Evaluate freshness at this time instead of now
    #[arg(long)]
    pub now: Option<u64>,
}
