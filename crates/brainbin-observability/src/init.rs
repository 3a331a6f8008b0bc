// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization
//!
//! Console output is always on. With the `file-logging` feature, each run also writes JSON logs
//! into its own timestamped folder, and old run folders are pruned by age and count.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;

const RUN_FOLDER_PREFIX: &str = "run_";
const RUN_FOLDER_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Keeps file writers alive; logs are flushed when this is dropped.
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Folder of this run's log files, if file logging is active.
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Initialize the global subscriber
///
/// Creates, when `log_dir` is given and the `file-logging` feature is enabled:
/// ```text
/// ./logs/
///   └── run_20250101_120000/
///       ├── brainbin-serialization.log
///       ├── brainbin-config.log
///       ├── ...
///       └── combined.log
/// ```
///
/// # Arguments
/// * `debug_flags` - Per-crate debug flags for filtering
/// * `default_level` - Level for crates without a debug flag
/// * `log_dir` - Base directory for log files; `None` logs to the console only
/// * `retention_days` - Keep runs for N days (default: 30)
/// * `retention_runs` - Keep N most recent runs (default: 10)
///
/// # Errors
/// Fails if the log folder cannot be created or a global subscriber is already installed.
pub fn init_logging(
    debug_flags: &CrateDebugFlags,
    default_level: &str,
    log_dir: Option<PathBuf>,
    retention_days: Option<u64>,
    retention_runs: Option<usize>,
) -> Result<LoggingGuard> {
    let filter = debug_flags.to_filter_string(default_level);
    let env_filter = EnvFilter::try_new(&filter)
        .with_context(|| format!("Invalid log filter: {}", filter))?;

    let mut layers = Vec::new();
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_filter(env_filter);
    layers.push(console_layer.boxed());

    #[cfg(feature = "file-logging")]
    let (file_guards, run_folder) = match log_dir {
        Some(base_log_dir) => {
            let run_folder = create_run_folder(&base_log_dir)?;
            cleanup_old_logs(&base_log_dir, retention_days, retention_runs)?;
            let guards = push_file_layers(&mut layers, &run_folder, &filter);
            (guards, Some(run_folder))
        }
        None => (Vec::new(), None),
    };

    #[cfg(not(feature = "file-logging"))]
    let run_folder: Option<PathBuf> = {
        let _ = (retention_days, retention_runs);
        if let Some(base_log_dir) = &log_dir {
            eprintln!(
                "Warning: file logging to {} requested, but brainbin was built without the \
                 `file-logging` feature; logging to the console only",
                base_log_dir.display()
            );
        }
        None
    };

    Registry::default()
        .with(layers)
        .try_init()
        .context("Failed to install the global tracing subscriber")?;

    Ok(LoggingGuard {
        #[cfg(feature = "file-logging")]
        _file_guards: file_guards,
        log_dir: run_folder,
    })
}

/// Initialize console-only logging at `info`
pub fn init_logging_default(debug_flags: &CrateDebugFlags) -> Result<LoggingGuard> {
    init_logging(debug_flags, "info", None, None, None)
}

#[cfg(feature = "file-logging")]
fn create_run_folder(base_log_dir: &Path) -> Result<PathBuf> {
    let timestamp = Utc::now().format(RUN_FOLDER_FORMAT);
    let run_folder = base_log_dir.join(format!("{}{}", RUN_FOLDER_PREFIX, timestamp));
    std::fs::create_dir_all(&run_folder)
        .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;
    Ok(run_folder)
}

#[cfg(feature = "file-logging")]
fn push_file_layers(
    layers: &mut Vec<Box<dyn Layer<Registry> + Send + Sync>>,
    run_folder: &Path,
    filter: &str,
) -> Vec<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_appender::rolling;

    let mut file_guards = Vec::new();

    for crate_name in crate::KNOWN_CRATES {
        let file_appender = rolling::never(run_folder, format!("{}.log", crate_name));
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        file_guards.push(guard);

        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .with_filter(EnvFilter::new(format!(
                "{}=debug,off",
                crate_name.replace('-', "_")
            )))
            .boxed();
        layers.push(file_layer);
    }

    let combined_appender = rolling::never(run_folder, "combined.log");
    let (combined_non_blocking, combined_guard) = tracing_appender::non_blocking(combined_appender);
    file_guards.push(combined_guard);

    let combined_layer = tracing_subscriber::fmt::layer()
        .with_writer(combined_non_blocking)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .json()
        .with_filter(EnvFilter::new(filter))
        .boxed();
    layers.push(combined_layer);

    file_guards
}

fn parse_run_folder_name(dir_name: &str) -> Option<DateTime<Utc>> {
    let timestamp = dir_name.strip_prefix(RUN_FOLDER_PREFIX)?;
    let naive = NaiveDateTime::parse_from_str(timestamp, RUN_FOLDER_FORMAT).ok()?;
    Some(Utc.from_utc_datetime(&naive))
}

/// Remove `run_*` folders older than `retention_days`, then all but the newest `retention_runs`
///
/// Folders whose names do not parse as run timestamps are left alone. Returns the number of
/// folders removed.
pub fn cleanup_old_logs(
    base_log_dir: &Path,
    retention_days: Option<u64>,
    retention_runs: Option<usize>,
) -> Result<usize> {
    if !base_log_dir.exists() {
        return Ok(0);
    }

    let retention_days = retention_days.unwrap_or(30);
    let retention_runs = retention_runs.unwrap_or(10);
    let cutoff_date = Utc::now() - chrono::Duration::days(retention_days as i64);

    let mut runs: Vec<(PathBuf, DateTime<Utc>)> = Vec::new();
    for entry in std::fs::read_dir(base_log_dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        if let Some(dt) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(parse_run_folder_name)
        {
            runs.push((path, dt));
        }
    }

    // newest first
    runs.sort_by_key(|(_, dt)| std::cmp::Reverse(*dt));

    let mut removed_count = 0;
    for (index, (path, dt)) in runs.iter().enumerate() {
        if index < retention_runs && *dt >= cutoff_date {
            continue;
        }
        match std::fs::remove_dir_all(path) {
            Ok(()) => removed_count += 1,
            Err(e) => eprintln!(
                "Warning: Failed to remove old log directory {}: {}",
                path.display(),
                e
            ),
        }
    }

    Ok(removed_count)
}
