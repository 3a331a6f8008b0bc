// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `brainbin_configuration.toml`.

use std::path::PathBuf;

use brainbin_structures::{
    Analysis, ConfigurationError, Hemisphere, Statistic, FSAVERAGE5_N_VERTICES,
};
use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BrainbinConfig {
    pub paths: PathsConfig,
    pub conversion: ConversionConfig,
    pub logging: LoggingConfig,
}

/// Input and output locations
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Surface read per hemisphere as `{input_dir}/{hemi}.{surface_name}`.
    pub surface_name: String,
    /// Prepended to the statistic code in `.dat` file names.
    pub stat_file_prefix: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("output"),
            surface_name: "pial".to_string(),
            stat_file_prefix: String::new(),
        }
    }
}

impl PathsConfig {
    pub fn surface_path(&self, hemisphere: Hemisphere) -> PathBuf {
        self.input_dir.join(format!("{}.{}", hemisphere, self.surface_name))
    }

    pub fn statistic_path(
        &self,
        hemisphere: Hemisphere,
        analysis: Analysis,
        statistic: Statistic,
    ) -> PathBuf {
        self.input_dir
            .join(format!("results_{}_{}", hemisphere, analysis))
            .join(format!("{}{}.dat", self.stat_file_prefix, statistic))
    }

    pub fn geometry_output_path(&self, hemisphere: Hemisphere) -> PathBuf {
        self.output_dir.join(format!("{}_geometry.bin.gz", hemisphere))
    }

    /// Container and sidecar paths for one statistic.
    pub fn statistic_output_paths(
        &self,
        hemisphere: Hemisphere,
        analysis: Analysis,
        statistic: Statistic,
    ) -> (PathBuf, PathBuf) {
        let stem = format!("{}_{}_{}", hemisphere, analysis, statistic);
        (
            self.output_dir.join(format!("{}.bin.gz", stem)),
            self.output_dir.join(format!("{}.json", stem)),
        )
    }
}

/// What gets converted
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Vertices per statistic volume; fixed by the mesh resolution.
    pub n_vertices: usize,
    pub hemispheres: Vec<String>,
    pub analyses: Vec<String>,
    /// Write to a `.tmp` sibling and rename into place.
    pub atomic_writes: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            n_vertices: FSAVERAGE5_N_VERTICES,
            hemispheres: Hemisphere::ALL.iter().map(|h| h.to_string()).collect(),
            analyses: Analysis::ALL.iter().map(|a| a.to_string()).collect(),
            atomic_writes: true,
        }
    }
}

impl ConversionConfig {
    /// # Errors
    /// [`ConfigurationError::UnknownIdentifier`] for the first unrecognized code.
    pub fn hemispheres(&self) -> Result<Vec<Hemisphere>, ConfigurationError> {
        self.hemispheres.iter().map(|code| code.parse()).collect()
    }

    /// # Errors
    /// [`ConfigurationError::UnknownIdentifier`] for the first unrecognized code.
    pub fn analyses(&self) -> Result<Vec<Analysis>, ConfigurationError> {
        self.analyses.iter().map(|code| code.parse()).collect()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level for crates without a debug flag.
    pub log_level: String,
    /// Write per-run JSON log files (requires the `file-logging` feature).
    pub file_logging: bool,
    pub log_dir: PathBuf,
    pub retention_days: u64,
    pub retention_runs: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            file_logging: false,
            log_dir: PathBuf::from("logs"),
            retention_days: 7,
            retention_runs: 20,
        }
    }
}
