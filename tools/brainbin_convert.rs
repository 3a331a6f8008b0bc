// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
brainbin conversion tool

Converts FreeSurfer surfaces and `.dat` statistic volumes into `BRG1`/`BRS1` containers, or
prints the header of an existing container.

Usage:
  cargo run --bin brainbin_convert -- convert --input-dir data --output-dir web/data
  cargo run --bin brainbin_convert -- inspect web/data/lh_des1_conT.bin.gz
*/

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info, warn};

use brainbin::config::{load_config, load_config_or_default, validate_config, BrainbinConfig};
use brainbin::inspect::inspect_container;
use brainbin::observability::{debug_flags_help, init_logging, parse_debug_flags};
use brainbin::pipeline::{run_batch, ConversionOutcome};

/// Convert neuroimaging surfaces and statistics into brain viewer containers
#[derive(Parser, Debug)]
#[command(name = "brainbin_convert", version, author, long_about = None, after_help = debug_flags_help())]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging for a crate (repeatable), e.g. `--debug brainbin-serialization`
    #[arg(long = "debug", value_name = "CRATE", global = true)]
    debug: Vec<String>,

    /// Enable debug logging for all brainbin crates
    #[arg(long = "debug-all", global = true, default_value_t = false)]
    debug_all: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert every configured hemisphere, analysis and statistic
    Convert(ConvertArgs),
    /// Print the header of a .bin.gz container
    Inspect {
        /// Container file, gzip-compressed or raw
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Path to brainbin_configuration.toml (searched for when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    input_dir: Option<PathBuf>,

    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Comma-separated hemisphere codes, e.g. "lh,rh"
    #[arg(long)]
    hemispheres: Option<String>,

    /// Comma-separated analysis codes, e.g. "des1,des2,compare"
    #[arg(long)]
    analyses: Option<String>,

    /// Prefix of the .dat file names, e.g. "blmm_vox_"
    #[arg(long)]
    stat_file_prefix: Option<String>,

    /// Write outputs in place instead of through a temporary file
    #[arg(long, default_value_t = false)]
    no_atomic_writes: bool,

    /// Default log level for crates without a debug flag
    #[arg(long)]
    log_level: Option<String>,
}

impl ConvertArgs {
    fn overrides(&self) -> HashMap<String, String> {
        let mut overrides = HashMap::new();
        if let Some(dir) = &self.input_dir {
            overrides.insert("input_dir".to_string(), dir.display().to_string());
        }
        if let Some(dir) = &self.output_dir {
            overrides.insert("output_dir".to_string(), dir.display().to_string());
        }
        if let Some(value) = &self.hemispheres {
            overrides.insert("hemispheres".to_string(), value.clone());
        }
        if let Some(value) = &self.analyses {
            overrides.insert("analyses".to_string(), value.clone());
        }
        if let Some(value) = &self.stat_file_prefix {
            overrides.insert("stat_file_prefix".to_string(), value.clone());
        }
        if self.no_atomic_writes {
            overrides.insert("atomic_writes".to_string(), "false".to_string());
        }
        if let Some(value) = &self.log_level {
            overrides.insert("log_level".to_string(), value.clone());
        }
        overrides
    }

    fn load(&self) -> Result<BrainbinConfig> {
        let overrides = self.overrides();
        let config = match &self.config {
            Some(path) => load_config(Some(path), Some(&overrides))
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => load_config_or_default(Some(&overrides))?,
        };
        validate_config(&config)?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    // `--debug-{crate}` flags are read by parse_debug_flags, not clap
    let cli = Cli::parse_from(
        std::env::args().filter(|arg| !arg.starts_with("--debug-") || arg == "--debug-all"),
    );
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut debug_flags = parse_debug_flags();
    for crate_name in &cli.debug {
        debug_flags.enable(crate_name);
    }
    if cli.debug_all {
        debug_flags.enable_all();
    }

    match cli.command {
        Command::Convert(args) => {
            let config = args.load()?;
            let logging = &config.logging;
            let _guard = init_logging(
                &debug_flags,
                &logging.log_level,
                logging.file_logging.then(|| logging.log_dir.clone()),
                Some(logging.retention_days),
                Some(logging.retention_runs),
            )?;
            for name in debug_flags.unknown_crates() {
                warn!("Unknown crate in debug flags: {}", name);
            }
            convert(&config)
        }
        Command::Inspect { file } => {
            let _guard = init_logging(&debug_flags, "warn", None, None, None)?;
            let bytes = std::fs::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let summary = inspect_container(&bytes)
                .with_context(|| format!("Failed to decode {}", file.display()))?;
            println!("{}", file.display());
            println!("{}", summary);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn convert(config: &BrainbinConfig) -> Result<ExitCode> {
    let report = run_batch(config)?;

    for outcome in &report.outcomes {
        match outcome {
            ConversionOutcome::Converted(converted) => {
                if let Some(warning) = &converted.volume_count_warning {
                    println!("  ! {}: {}", converted.target, warning);
                } else {
                    println!("  ✓ {}", converted.target);
                }
            }
            ConversionOutcome::Skipped {
                target,
                missing_input,
            } => println!("  - {} (missing {})", target, missing_input.display()),
            ConversionOutcome::Failed { target, error } => println!("  ✗ {}: {}", target, error),
        }
    }
    println!(
        "{} converted, {} skipped, {} failed",
        report.converted_count(),
        report.skipped_count(),
        report.failed_count()
    );

    if report.has_failures() {
        error!("{} conversions failed", report.failed_count());
        return Ok(ExitCode::FAILURE);
    }
    info!("Output written to {}", config.paths.output_dir.display());
    Ok(ExitCode::SUCCESS)
}
