// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Batch conversion driver.
//!
//! Enumerates the expected inputs by naming convention, converts each one independently, and
//! reports an explicit [`ConversionOutcome`] per target. Missing inputs are skipped, malformed
//! inputs fail only their own conversion.

use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

use brainbin_config::{BrainbinConfig, PathsConfig};
use brainbin_serialization::{
    compress_gzip, read_surface_bytes, samples_from_le_bytes, GeometryContainer,
    StatisticContainer, StatisticSidecar, VolumeCountWarning,
};
use brainbin_structures::{
    estimate_vertex_normals, Analysis, ConfigurationError, FormatError, Hemisphere, Statistic,
    StatisticMetadataTable,
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

//region Errors and outcomes

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("malformed input: {0}")]
    Format(#[from] FormatError),

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize metadata sidecar: {0}")]
    Sidecar(#[from] serde_json::Error),
}

/// One unit of work in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionTarget {
    Geometry {
        hemisphere: Hemisphere,
    },
    Statistic {
        hemisphere: Hemisphere,
        analysis: Analysis,
        statistic: Statistic,
    },
}

impl Display for ConversionTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversionTarget::Geometry { hemisphere } => write!(f, "{}_geometry", hemisphere),
            ConversionTarget::Statistic {
                hemisphere,
                analysis,
                statistic,
            } => write!(f, "{}_{}_{}", hemisphere, analysis, statistic),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionReport {
    pub target: ConversionTarget,
    /// Files written, container first.
    pub outputs: Vec<PathBuf>,
    pub volume_count_warning: Option<VolumeCountWarning>,
}

#[derive(Debug)]
pub enum ConversionOutcome {
    Converted(ConversionReport),
    Skipped {
        target: ConversionTarget,
        missing_input: PathBuf,
    },
    Failed {
        target: ConversionTarget,
        error: ConversionError,
    },
}

impl ConversionOutcome {
    pub fn target(&self) -> ConversionTarget {
        match self {
            ConversionOutcome::Converted(report) => report.target,
            ConversionOutcome::Skipped { target, .. } | ConversionOutcome::Failed { target, .. } => {
                *target
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<ConversionOutcome>,
}

impl BatchReport {
    pub fn converted_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ConversionOutcome::Converted(_)))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ConversionOutcome::Skipped { .. }))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ConversionOutcome::Failed { .. }))
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| {
                matches!(o, ConversionOutcome::Converted(report) if report.volume_count_warning.is_some())
            })
            .count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }
}

//endregion

//region Encoding

/// Parses a FreeSurfer surface, estimates normals, and returns the gzip-compressed `BRG1`
/// container.
pub fn encode_geometry(surface_bytes: &[u8]) -> Result<Vec<u8>, ConversionError> {
    let surface = read_surface_bytes(surface_bytes)?;
    let normals = estimate_vertex_normals(&surface)?;
    let container = GeometryContainer::from_surface(&surface, &normals)?;
    debug!(
        "Geometry: {} vertices, {} faces, {} bytes uncompressed",
        container.n_vertices(),
        container.n_faces(),
        container.number_of_bytes_needed()
    );
    Ok(compress_gzip(&container.to_bytes()).map_err(FormatError::Io)?)
}

/// Splits raw `.dat` bytes into volumes of `n_vertices` and returns the gzip-compressed `BRS1`
/// container together with any volume count warning.
pub fn encode_statistic(
    dat_bytes: &[u8],
    n_vertices: usize,
    expected_volumes: usize,
) -> Result<(Vec<u8>, Option<VolumeCountWarning>), ConversionError> {
    let samples = samples_from_le_bytes(dat_bytes)?;
    let encoding = StatisticContainer::encode_samples(samples, n_vertices, expected_volumes)?;
    let gz = compress_gzip(&encoding.container.to_bytes()).map_err(FormatError::Io)?;
    Ok((gz, encoding.volume_count_warning))
}

//endregion

//region Output

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes a fully built buffer. With `atomic`, the bytes go to a `.tmp` sibling that is renamed
/// over `path`, so `path` is either absent, the previous file, or complete.
pub fn write_output(path: &Path, bytes: &[u8], atomic: bool) -> Result<(), ConversionError> {
    let write_error = |source: std::io::Error| ConversionError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }

    if !atomic {
        return fs::write(path, bytes).map_err(write_error);
    }

    let tmp = temporary_path(path);
    if let Err(e) = fs::write(&tmp, bytes).and_then(|_| fs::rename(&tmp, path)) {
        let _ = fs::remove_file(&tmp);
        return Err(write_error(e));
    }
    Ok(())
}

//endregion

//region Batch driver

/// Runs conversions for one configuration.
pub struct BatchConverter<'a> {
    paths: &'a PathsConfig,
    n_vertices: usize,
    atomic_writes: bool,
    metadata: &'a StatisticMetadataTable,
}

impl<'a> BatchConverter<'a> {
    pub fn new(config: &'a BrainbinConfig) -> Self {
        Self {
            paths: &config.paths,
            n_vertices: config.conversion.n_vertices,
            atomic_writes: config.conversion.atomic_writes,
            metadata: StatisticMetadataTable::standard(),
        }
    }

    /// Replaces the built-in metadata table.
    pub fn with_metadata_table(mut self, metadata: &'a StatisticMetadataTable) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn convert_geometry(&self, hemisphere: Hemisphere) -> ConversionOutcome {
        let target = ConversionTarget::Geometry { hemisphere };
        let input = self.paths.surface_path(hemisphere);
        let output = self.paths.geometry_output_path(hemisphere);

        self.run_target(target, &input, |bytes| {
            let gz = encode_geometry(bytes)?;
            write_output(&output, &gz, self.atomic_writes)?;
            Ok(ConversionReport {
                target,
                outputs: vec![output.clone()],
                volume_count_warning: None,
            })
        })
    }

    pub fn convert_statistic(
        &self,
        hemisphere: Hemisphere,
        analysis: Analysis,
        statistic: Statistic,
    ) -> ConversionOutcome {
        let target = ConversionTarget::Statistic {
            hemisphere,
            analysis,
            statistic,
        };
        let input = self.paths.statistic_path(hemisphere, analysis, statistic);
        let (container_path, sidecar_path) = self
            .paths
            .statistic_output_paths(hemisphere, analysis, statistic);

        self.run_target(target, &input, |bytes| {
            // both buffers are built before either file is written
            let sidecar = StatisticSidecar::build(hemisphere, analysis, statistic, self.metadata)?;
            let json = sidecar.to_json_pretty()?;
            let (gz, volume_count_warning) =
                encode_statistic(bytes, self.n_vertices, statistic.expected_volumes())?;

            write_output(&container_path, &gz, self.atomic_writes)?;
            if let Err(e) = write_output(&sidecar_path, json.as_bytes(), self.atomic_writes) {
                // a container without its sidecar must not look like a finished conversion
                if let Err(remove_error) = fs::remove_file(&container_path) {
                    warn!(
                        "Failed to remove {} after sidecar error: {}",
                        container_path.display(),
                        remove_error
                    );
                }
                return Err(e);
            }
            Ok(ConversionReport {
                target,
                outputs: vec![container_path.clone(), sidecar_path.clone()],
                volume_count_warning,
            })
        })
    }

    fn run_target<F>(&self, target: ConversionTarget, input: &Path, convert: F) -> ConversionOutcome
    where
        F: FnOnce(&[u8]) -> Result<ConversionReport, ConversionError>,
    {
        if !input.is_file() {
            warn!("Skipping {}: {} not found", target, input.display());
            return ConversionOutcome::Skipped {
                target,
                missing_input: input.to_path_buf(),
            };
        }

        let result = fs::read(input)
            .map_err(|source| ConversionError::Read {
                path: input.to_path_buf(),
                source,
            })
            .and_then(|bytes| convert(&bytes));

        match result {
            Ok(report) => {
                if let Some(warning) = &report.volume_count_warning {
                    warn!("{}: {}", target, warning);
                }
                info!("Converted {} -> {}", input.display(), display_paths(&report.outputs));
                ConversionOutcome::Converted(report)
            }
            Err(error) => {
                error!("Failed to convert {}: {}", input.display(), error);
                ConversionOutcome::Failed { target, error }
            }
        }
    }

    /// Geometry for every hemisphere, then every statistic each analysis produces.
    pub fn run(&self, hemispheres: &[Hemisphere], analyses: &[Analysis]) -> BatchReport {
        let mut report = BatchReport::default();

        for &hemisphere in hemispheres {
            report.outcomes.push(self.convert_geometry(hemisphere));
        }
        for &hemisphere in hemispheres {
            for &analysis in analyses {
                for statistic in analysis.statistics() {
                    report
                        .outcomes
                        .push(self.convert_statistic(hemisphere, analysis, statistic));
                }
            }
        }

        info!(
            "Batch finished: {} converted, {} skipped, {} failed, {} with warnings",
            report.converted_count(),
            report.skipped_count(),
            report.failed_count(),
            report.warning_count()
        );
        report
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Converts everything the configuration selects.
///
/// # Errors
/// Only configuration problems abort the batch; per-file failures are reported in the
/// returned [`BatchReport`].
pub fn run_batch(config: &BrainbinConfig) -> Result<BatchReport, ConversionError> {
    let hemispheres = config.conversion.hemispheres()?;
    let analyses = config.conversion.analyses()?;
    info!(
        "Converting {} -> {}",
        config.paths.input_dir.display(),
        config.paths.output_dir.display()
    );
    Ok(BatchConverter::new(config).run(&hemispheres, &analyses))
}

//endregion
