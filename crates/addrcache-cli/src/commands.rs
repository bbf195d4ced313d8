use std::fs;

use addrcache_store::{Envelope, ValidationConfig, Validity};
use addrcache_types::{AddressData, Clock, LookupKey, SystemClock};
use anyhow::{bail, Context};
use colored::Colorize;
use serde_json::json;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = effective_config(&cli)?;
    match cli.command {
        Command::Key(args) => cmd_key(args, cli.format),
        Command::Wrap(args) => cmd_wrap(args, &config),
        Command::Inspect(args) => cmd_inspect(args, &config, cli.format),
        Command::Config => cmd_config(&config, cli.format),
    }
}

/// Config file (or defaults) with command-line overrides applied.
fn effective_config(cli: &Cli) -> anyhow::Result<ValidationConfig> {
    let mut config = match &cli.config {
        Some(path) => ValidationConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ValidationConfig::default(),
    };
    if let Some(algorithm) = cli.algorithm {
        config.algorithm = algorithm;
    }
    if let Some(secs) = cli.stale_threshold_secs {
        config.stale_threshold_secs = secs;
    }
    tracing::debug!(?config, "effective config");
    Ok(config)
}

fn cmd_key(args: KeyArgs, format: OutputFormat) -> anyhow::Result<()> {
    let address = AddressData::new(args.country)
        .with_admin_area(args.admin_area)
        .with_locality(args.locality)
        .with_dependent_locality(args.dependent_locality);
    let key = LookupKey::from_address(&address);
    if key.is_empty() {
        bail!("a non-empty --country is required");
    }
    let key_string = key.to_key_string(args.depth);

    match format {
        OutputFormat::Json => println!(
            "{}",
            json!({ "key": key_string, "depth": key.depth(), "region_code": key.region_code() })
        ),
        OutputFormat::Text => {
            println!("{}", key_string.bold());
            println!("  Region: {}", key.region_code().cyan());
            println!("  Depth: {}", key.depth());
        }
    }
    Ok(())
}

fn cmd_wrap(args: WrapArgs, config: &ValidationConfig) -> anyhow::Result<()> {
    let payload = fs::read(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let now = args.timestamp.unwrap_or_else(|| SystemClock.now_secs());
    let wrapped = addrcache_store::wrap(&payload, now, config.algorithm);
    fs::write(&args.output, &wrapped)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!(
        "{} Wrapped {} bytes into {} ({})",
        "✓".green().bold(),
        payload.len(),
        args.output.display(),
        config.algorithm
    );
    Ok(())
}

/// Outcome of checking one wrapped entry.
#[derive(Debug, PartialEq, Eq)]
struct Report {
    validity: Validity,
    timestamp: Option<u64>,
    age: Option<u64>,
    checksum: Option<String>,
    payload_len: Option<usize>,
    reason: Option<String>,
}

fn inspect_bytes(bytes: &[u8], now: u64, config: &ValidationConfig) -> Report {
    let envelope = match Envelope::parse(bytes) {
        Ok(envelope) => envelope,
        Err(e) => {
            return Report {
                validity: Validity::Corrupt,
                timestamp: None,
                age: None,
                checksum: None,
                payload_len: None,
                reason: Some(e.to_string()),
            }
        }
    };
    let validity = envelope.validate(now, config.stale_threshold(), config.algorithm);
    let reason = (validity == Validity::Corrupt)
        .then(|| format!("{} checksum mismatch", config.algorithm));
    Report {
        validity,
        timestamp: Some(envelope.timestamp),
        age: Some(envelope.age(now)),
        checksum: Some(envelope.checksum.to_hex()),
        payload_len: Some(envelope.payload.len()),
        reason,
    }
}

fn cmd_inspect(
    args: InspectArgs,
    config: &ValidationConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let bytes = fs::read(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let now = args.now.unwrap_or_else(|| SystemClock.now_secs());
    let report = inspect_bytes(&bytes, now, config);

    match format {
        OutputFormat::Json => println!(
            "{}",
            json!({
                "status": report.validity.to_string(),
                "timestamp": report.timestamp,
                "age_secs": report.age,
                "checksum": report.checksum,
                "payload_len": report.payload_len,
                "reason": report.reason,
            })
        ),
        OutputFormat::Text => {
            let status = match report.validity {
                Validity::Valid => "valid".green().bold(),
                Validity::Stale => "stale".yellow().bold(),
                Validity::Corrupt => "corrupt".red().bold(),
            };
            println!("Status: {status}");
            if let (Some(ts), Some(age)) = (report.timestamp, report.age) {
                println!("  Timestamp: {ts} ({age}s old, threshold {}s)", config.stale_threshold_secs);
            }
            if let Some(checksum) = &report.checksum {
                println!("  Checksum: {}", checksum.dimmed());
            }
            if let Some(len) = report.payload_len {
                println!("  Payload: {len} bytes");
            }
            if let Some(reason) = &report.reason {
                println!("  Reason: {}", reason.red());
            }
        }
    }

    if report.validity == Validity::Corrupt {
        bail!("{} is corrupt", args.input.display());
    }
    Ok(())
}

fn cmd_config(config: &ValidationConfig, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!(
            "{}",
            json!({
                "stale_threshold_secs": config.stale_threshold_secs,
                "algorithm": config.algorithm,
            })
        ),
        OutputFormat::Text => print!("{}", config.to_toml_string()?),
    }
    Ok(())
}
