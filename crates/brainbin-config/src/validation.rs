//! Configuration validation
//!
//! Checks that configuration values are usable before any file is touched, and that the static
//! metadata table agrees with the expected volume counts of every statistic that will be written.

use brainbin_structures::{Analysis, Statistic, StatisticMetadataTable};

use crate::{BrainbinConfig, ConfigError, ConfigResult};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration against the built-in metadata table
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &BrainbinConfig) -> ConfigResult<()> {
    validate_config_with_table(config, StatisticMetadataTable::standard())
}

/// Validate the configuration against an explicit metadata table
///
/// Checks for:
/// - Required fields (paths, hemisphere and analysis lists)
/// - Valid values (vertex count, identifier codes, log level)
/// - Metadata coverage of every statistic the selected analyses produce
pub fn validate_config_with_table(
    config: &BrainbinConfig,
    table: &StatisticMetadataTable,
) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_required_fields(config, &mut errors);
    validate_values(config, &mut errors);
    validate_metadata(config, table, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_required_fields(config: &BrainbinConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.paths.input_dir.as_os_str().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "paths.input_dir".to_string(),
        });
    }
    if config.paths.output_dir.as_os_str().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "paths.output_dir".to_string(),
        });
    }
    if config.paths.surface_name.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "paths.surface_name".to_string(),
        });
    }
    if config.conversion.hemispheres.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "conversion.hemispheres".to_string(),
        });
    }
    if config.conversion.analyses.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "conversion.analyses".to_string(),
        });
    }
}

fn validate_values(config: &BrainbinConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.conversion.n_vertices == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "conversion.n_vertices".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    if let Err(e) = config.conversion.hemispheres() {
        errors.push(ConfigValidationError::InvalidValue {
            field: "conversion.hemispheres".to_string(),
            reason: e.to_string(),
        });
    }
    if let Err(e) = config.conversion.analyses() {
        errors.push(ConfigValidationError::InvalidValue {
            field: "conversion.analyses".to_string(),
            reason: e.to_string(),
        });
    }
    if !LOG_LEVELS.contains(&config.logging.log_level.to_lowercase().as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.log_level".to_string(),
            reason: format!("must be one of {}", LOG_LEVELS.join(", ")),
        });
    }
}

fn validate_metadata(
    config: &BrainbinConfig,
    table: &StatisticMetadataTable,
    errors: &mut Vec<ConfigValidationError>,
) {
    // unknown analysis codes are already reported by validate_values
    let Ok(analyses) = config.conversion.analyses() else {
        return;
    };
    let mut statistics: Vec<Statistic> = analyses.iter().flat_map(Analysis::statistics).collect();
    statistics.sort_by_key(|statistic| statistic.as_str());
    statistics.dedup();

    if let Err(e) = table.validate(&statistics) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "statistic metadata".to_string(),
            reason: e.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brainbin_structures::StatisticMetadataEntry;

    #[test]
    fn test_default_config_is_valid() {
        let config = BrainbinConfig::default();
        let result = validate_config(&config);
        if let Err(e) = &result {
            eprintln!("Validation error: {}", e);
        }
        assert!(result.is_ok());
    }

    #[test]
    fn test_zero_vertices() {
        let mut config = BrainbinConfig::default();
        config.conversion.n_vertices = 0;

        match validate_config(&config) {
            Err(ConfigError::ValidationError(msg)) => {
                assert!(msg.contains("conversion.n_vertices"));
                assert!(msg.contains("must be positive"));
            }
            other => panic!("expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_lists_and_unknown_codes() {
        let mut config = BrainbinConfig::default();
        config.conversion.hemispheres.clear();
        config.conversion.analyses = vec!["des3".to_string()];

        match validate_config(&config) {
            Err(ConfigError::ValidationError(msg)) => {
                assert!(msg.contains("Missing required configuration: conversion.hemispheres"));
                assert!(msg.contains("des3"));
            }
            other => panic!("expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = BrainbinConfig::default();
        config.logging.log_level = "verbose".to_string();

        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(msg)) if msg.contains("logging.log_level")));
    }

    #[test]
    fn test_label_count_mismatch_in_table() {
        let mut config = BrainbinConfig::default();
        config.conversion.analyses = vec!["compare".to_string()];

        let standard = StatisticMetadataTable::standard();
        let chi2 = standard.lookup(Statistic::Chi2).unwrap().clone();
        let chi2lp = StatisticMetadataEntry {
            labels: vec!["a".to_string(), "b".to_string()],
            ..standard.lookup(Statistic::Chi2lp).unwrap().clone()
        };
        let table = StatisticMetadataTable::from_entries([
            (Statistic::Chi2, chi2),
            (Statistic::Chi2lp, chi2lp),
        ]);

        match validate_config_with_table(&config, &table) {
            Err(ConfigError::ValidationError(msg)) => assert!(msg.contains("Chi2lp")),
            other => panic!("expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_design_analyses_ignore_compare_metadata() {
        let mut config = BrainbinConfig::default();
        config.conversion.analyses = vec!["des1".to_string()];

        let standard = StatisticMetadataTable::standard();
        let table = StatisticMetadataTable::from_entries(
            [Statistic::TStat, Statistic::LogP, Statistic::Beta, Statistic::Sigma2]
                .into_iter()
                .map(|statistic| (statistic, standard.lookup(statistic).unwrap().clone())),
        );

        assert!(validate_config_with_table(&config, &table).is_ok());
    }
}
