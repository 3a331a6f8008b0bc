// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Values are resolved in three tiers, later tiers winning:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{BrainbinConfig, ConfigError, ConfigResult, CONFIG_FILE_NAME};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Find the brainbin configuration file
///
/// Search order:
/// 1. `BRAINBIN_CONFIG_PATH` environment variable
/// 2. Current working directory: `./brainbin_configuration.toml`
/// 3. Parent directories, up to 5 levels
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("BRAINBIN_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        } else {
            return Err(ConfigError::FileNotFound(format!(
                "Config file specified by BRAINBIN_CONFIG_PATH not found: {}",
                path.display()
            )));
        }
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join(CONFIG_FILE_NAME));
                current = parent.to_path_buf();
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "brainbin configuration file '{}' not found in any of these locations:\n{}\n\nSet BRAINBIN_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML. Validation is separate,
/// see [`crate::validate_config`].
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<BrainbinConfig> {
    let config_file = if let Some(path) = config_path {
        path.to_path_buf()
    } else {
        find_config_file()?
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: BrainbinConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config)?;
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli)?;
    }

    Ok(config)
}

/// Like [`load_config`] with no explicit path, but falls back to built-in defaults (plus
/// overrides) when no configuration file exists anywhere on the search path.
///
/// # Errors
///
/// Unreadable or unparsable files still fail.
pub fn load_config_or_default(
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<BrainbinConfig> {
    match load_config(None, cli_args) {
        Err(ConfigError::FileNotFound(_)) if env::var("BRAINBIN_CONFIG_PATH").is_err() => {
            let mut config = BrainbinConfig::default();
            apply_environment_overrides(&mut config)?;
            if let Some(cli) = cli_args {
                apply_cli_overrides(&mut config, cli)?;
            }
            Ok(config)
        }
        other => other,
    }
}

fn parse_n_vertices(source: &str, value: &str) -> ConfigResult<usize> {
    value.trim().parse::<usize>().map_err(|_| {
        ConfigError::InvalidValue(format!(
            "{} must be a non-negative integer, got {:?}",
            source, value
        ))
    })
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `BRAINBIN_INPUT_DIR` -> `paths.input_dir`
/// - `BRAINBIN_OUTPUT_DIR` -> `paths.output_dir`
/// - `BRAINBIN_N_VERTICES` -> `conversion.n_vertices`
/// - `BRAINBIN_HEMISPHERES` -> `conversion.hemispheres` (comma-separated)
/// - `BRAINBIN_ANALYSES` -> `conversion.analyses` (comma-separated)
/// - `BRAINBIN_LOG_LEVEL` -> `logging.log_level`
///
/// # Errors
///
/// [`ConfigError::InvalidValue`] if `BRAINBIN_N_VERTICES` is not an integer.
pub fn apply_environment_overrides(config: &mut BrainbinConfig) -> ConfigResult<()> {
    if let Ok(value) = env::var("BRAINBIN_INPUT_DIR") {
        config.paths.input_dir = PathBuf::from(value);
    }
    if let Ok(value) = env::var("BRAINBIN_OUTPUT_DIR") {
        config.paths.output_dir = PathBuf::from(value);
    }

    if let Ok(value) = env::var("BRAINBIN_N_VERTICES") {
        config.conversion.n_vertices = parse_n_vertices("BRAINBIN_N_VERTICES", &value)?;
    }
    if let Ok(value) = env::var("BRAINBIN_HEMISPHERES") {
        config.conversion.hemispheres = split_list(&value);
    }
    if let Ok(value) = env::var("BRAINBIN_ANALYSES") {
        config.conversion.analyses = split_list(&value);
    }

    if let Ok(value) = env::var("BRAINBIN_LOG_LEVEL") {
        config.logging.log_level = value;
    }

    Ok(())
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"input_dir": "/data", "hemispheres": "lh"}`)
///
/// # Errors
///
/// [`ConfigError::InvalidValue`] if `n_vertices` is not an integer.
pub fn apply_cli_overrides(
    config: &mut BrainbinConfig,
    cli_args: &HashMap<String, String>,
) -> ConfigResult<()> {
    if let Some(value) = cli_args.get("input_dir") {
        config.paths.input_dir = PathBuf::from(value);
    }
    if let Some(value) = cli_args.get("output_dir") {
        config.paths.output_dir = PathBuf::from(value);
    }
    if let Some(value) = cli_args.get("surface_name") {
        config.paths.surface_name = value.clone();
    }
    if let Some(value) = cli_args.get("stat_file_prefix") {
        config.paths.stat_file_prefix = value.clone();
    }

    if let Some(value) = cli_args.get("n_vertices") {
        config.conversion.n_vertices = parse_n_vertices("n_vertices", value)?;
    }
    if let Some(value) = cli_args.get("hemispheres") {
        config.conversion.hemispheres = split_list(value);
    }
    if let Some(value) = cli_args.get("analyses") {
        config.conversion.analyses = split_list(value);
    }
    if let Some(value) = cli_args.get("atomic_writes") {
        config.conversion.atomic_writes = value.to_lowercase() == "true" || value == "1";
    }

    if let Some(value) = cli_args.get("log_level") {
        config.logging.log_level = value.clone();
    }

    Ok(())
}
