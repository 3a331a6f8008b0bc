//! Display metadata for every statistic the model writes.
//!
//! The standard table is built once on first access and is read-only afterwards.

use ahash::AHashMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::{ConfigurationError, Statistic};

/// Labels shared by the per-contrast statistics (conT and conTlp).
pub const CONTRAST_LABELS: [&str; 5] = [
    "Intercept",
    "Sex",
    "CrossSectionalAge",
    "LongitudinalTime",
    "NIHScore",
];

/// How the viewer should draw vertices whose sample is NaN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NanHandling {
    #[default]
    Transparent,
    Gray,
    Zero,
}

/// Display information for one statistic.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticMetadataEntry {
    pub display_name: &'static str,
    pub description: &'static str,
    /// Colormap name, interpreted by the viewer.
    pub colormap: &'static str,
    /// Whether the color scale is centered on zero.
    pub symmetric: bool,
    pub suggested_threshold: Option<f32>,
    /// One label per volume, in volume order.
    pub labels: Vec<String>,
}

/// Lookup table from [`Statistic`] to its [`StatisticMetadataEntry`].
#[derive(Debug, Clone, Default)]
pub struct StatisticMetadataTable {
    entries: AHashMap<Statistic, StatisticMetadataEntry>,
}

static STANDARD_TABLE: Lazy<StatisticMetadataTable> = Lazy::new(|| {
    StatisticMetadataTable::from_entries([
        (
            Statistic::TStat,
            StatisticMetadataEntry {
                display_name: "T-Statistics",
                description: "T-statistics for testing whether contrasts differ from zero",
                colormap: "coolwarm",
                symmetric: true,
                suggested_threshold: Some(2.0),
                labels: contrast_labels(),
            },
        ),
        (
            Statistic::LogP,
            StatisticMetadataEntry {
                display_name: "-log10(p-values)",
                description: "Negative log10 of p-values (values > 1.3 correspond to p < 0.05)",
                colormap: "plasma",
                symmetric: false,
                suggested_threshold: Some(1.3),
                labels: contrast_labels(),
            },
        ),
        (
            Statistic::Beta,
            StatisticMetadataEntry {
                display_name: "Beta Coefficients",
                description: "Raw fixed effect coefficient estimates",
                colormap: "coolwarm",
                symmetric: true,
                suggested_threshold: None,
                labels: beta_labels(),
            },
        ),
        (
            Statistic::Sigma2,
            StatisticMetadataEntry {
                display_name: "Residual Variance",
                description: "Residual variance at each vertex",
                colormap: "viridis",
                symmetric: false,
                suggested_threshold: None,
                labels: vec!["Residual Variance".to_string()],
            },
        ),
        (
            Statistic::Chi2,
            StatisticMetadataEntry {
                display_name: "Chi-squared",
                description: "Likelihood-ratio chi-squared statistic comparing the two designs",
                colormap: "plasma",
                symmetric: false,
                suggested_threshold: None,
                labels: vec!["Chi-squared".to_string()],
            },
        ),
        (
            Statistic::Chi2lp,
            StatisticMetadataEntry {
                display_name: "Chi-squared log p-value",
                description: "Negative log10 of the chi-squared p-values (values > 1.3 correspond to p < 0.05)",
                colormap: "plasma",
                symmetric: false,
                suggested_threshold: Some(1.3),
                labels: vec!["Chi-squared log p-value".to_string()],
            },
        ),
    ])
});

fn contrast_labels() -> Vec<String> {
    CONTRAST_LABELS.iter().map(|label| label.to_string()).collect()
}

/// The five contrast labels followed by placeholder covariates 6 through 23.
fn beta_labels() -> Vec<String> {
    let mut labels = contrast_labels();
    labels.extend((6..=23).map(|i| format!("Covariate_{}", i)));
    labels
}

impl StatisticMetadataTable {
    /// The built-in table covering every [`Statistic`].
    pub fn standard() -> &'static StatisticMetadataTable {
        &STANDARD_TABLE
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Statistic, StatisticMetadataEntry)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// # Errors
    /// [`ConfigurationError::MissingMetadata`] if the table has no entry for `statistic`.
    pub fn lookup(
        &self,
        statistic: Statistic,
    ) -> Result<&StatisticMetadataEntry, ConfigurationError> {
        self.entries
            .get(&statistic)
            .ok_or_else(|| ConfigurationError::MissingMetadata {
                statistic: statistic.as_str().to_string(),
            })
    }

    /// Checks that every listed statistic has an entry whose label count matches
    /// [`Statistic::expected_volumes`].
    pub fn validate(&self, statistics: &[Statistic]) -> Result<(), ConfigurationError> {
        for &statistic in statistics {
            let entry = self.lookup(statistic)?;
            if entry.labels.len() != statistic.expected_volumes() {
                return Err(ConfigurationError::LabelCountMismatch {
                    statistic: statistic.as_str().to_string(),
                    labels: entry.labels.len(),
                    expected: statistic.expected_volumes(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_is_consistent() {
        let table = StatisticMetadataTable::standard();
        assert_eq!(table.len(), Statistic::ALL.len());
        assert!(table.validate(&Statistic::ALL).is_ok());
    }

    #[test]
    fn test_beta_labels() {
        let entry = StatisticMetadataTable::standard().lookup(Statistic::Beta).unwrap();
        assert_eq!(entry.labels.len(), 23);
        assert_eq!(entry.labels[4], "NIHScore");
        assert_eq!(entry.labels[5], "Covariate_6");
        assert_eq!(entry.labels[22], "Covariate_23");
    }

    #[test]
    fn test_missing_entry() {
        let table = StatisticMetadataTable::default();
        assert_eq!(
            table.lookup(Statistic::Sigma2).unwrap_err(),
            ConfigurationError::MissingMetadata {
                statistic: "sigma2".to_string()
            }
        );
    }

    #[test]
    fn test_label_count_mismatch() {
        let mut entry = StatisticMetadataTable::standard()
            .lookup(Statistic::TStat)
            .unwrap()
            .clone();
        entry.labels.pop();
        let table = StatisticMetadataTable::from_entries([(Statistic::TStat, entry)]);
        assert_eq!(
            table.validate(&[Statistic::TStat]).unwrap_err(),
            ConfigurationError::LabelCountMismatch {
                statistic: "conT".to_string(),
                labels: 4,
                expected: 5,
            }
        );
    }
}
