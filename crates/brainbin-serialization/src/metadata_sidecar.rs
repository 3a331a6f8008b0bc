use brainbin_structures::{
    Analysis, ConfigurationError, Hemisphere, NanHandling, Statistic, StatisticMetadataTable,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeLabel {
    pub index: u32,
    pub label: String,
}

/// JSON description written next to each `BRS1` container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticSidecar {
    pub name: String,
    pub display_name: String,
    pub description: String,
    /// `"left"` or `"right"`.
    pub hemisphere: String,
    pub analysis: String,
    pub colormap: String,
    pub symmetric: bool,
    pub suggested_threshold: Option<f32>,
    pub nan_handling: NanHandling,
    pub volumes: Vec<VolumeLabel>,
}

impl StatisticSidecar {
    /// # Errors
    /// [`ConfigurationError::MissingMetadata`] if `table` has no entry for `statistic`.
    pub fn build(
        hemisphere: Hemisphere,
        analysis: Analysis,
        statistic: Statistic,
        table: &StatisticMetadataTable,
    ) -> Result<Self, ConfigurationError> {
        let entry = table.lookup(statistic)?;
        Ok(Self {
            name: format!("{}_{}_{}", hemisphere, analysis, statistic),
            display_name: format!(
                "{} ({})",
                entry.display_name,
                analysis.as_str().to_uppercase()
            ),
            description: entry.description.to_string(),
            hemisphere: hemisphere.full_name().to_string(),
            analysis: analysis.as_str().to_string(),
            colormap: entry.colormap.to_string(),
            symmetric: entry.symmetric,
            suggested_threshold: entry.suggested_threshold,
            nan_handling: NanHandling::Transparent,
            volumes: entry
                .labels
                .iter()
                .enumerate()
                .map(|(index, label)| VolumeLabel {
                    index: index as u32,
                    label: label.clone(),
                })
                .collect(),
        })
    }

    /// Two-space indented JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_t_statistic_sidecar() {
        let sidecar = StatisticSidecar::build(
            Hemisphere::Left,
            Analysis::Design1,
            Statistic::TStat,
            StatisticMetadataTable::standard(),
        )
        .unwrap();

        assert_eq!(sidecar.name, "lh_des1_conT");
        assert_eq!(sidecar.display_name, "T-Statistics (DES1)");
        assert_eq!(sidecar.hemisphere, "left");
        assert_eq!(sidecar.colormap, "coolwarm");
        assert!(sidecar.symmetric);
        assert_eq!(sidecar.suggested_threshold, Some(2.0));
        assert_eq!(sidecar.volumes.len(), 5);
        assert_eq!(
            sidecar.volumes[3],
            VolumeLabel {
                index: 3,
                label: "LongitudinalTime".to_string()
            }
        );
    }

    #[test]
    fn test_json_shape() {
        let sidecar = StatisticSidecar::build(
            Hemisphere::Right,
            Analysis::Design2,
            Statistic::Sigma2,
            StatisticMetadataTable::standard(),
        )
        .unwrap();
        let json = sidecar.to_json_pretty().unwrap();

        assert!(json.starts_with("{\n  \"name\": \"rh_des2_sigma2\""));
        assert!(json.contains("\"suggested_threshold\": null"));
        assert!(json.contains("\"nan_handling\": \"transparent\""));
        assert!(json.contains("\"hemisphere\": \"right\""));

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["volumes"][0]["index"], 0);
        assert_eq!(parsed["volumes"][0]["label"], "Residual Variance");
        assert_eq!(parsed["display_name"], "Residual Variance (DES2)");
    }

    #[test]
    fn test_compare_analysis_sidecar() {
        let sidecar = StatisticSidecar::build(
            Hemisphere::Left,
            Analysis::Compare,
            Statistic::Chi2lp,
            StatisticMetadataTable::standard(),
        )
        .unwrap();
        assert_eq!(sidecar.name, "lh_compare_Chi2lp");
        assert_eq!(sidecar.display_name, "Chi-squared log p-value (COMPARE)");
        assert_eq!(sidecar.suggested_threshold, Some(1.3));
    }

    #[test]
    fn test_missing_metadata_entry() {
        let empty = StatisticMetadataTable::default();
        assert_eq!(
            StatisticSidecar::build(Hemisphere::Left, Analysis::Design1, Statistic::Beta, &empty)
                .unwrap_err(),
            ConfigurationError::MissingMetadata {
                statistic: "beta".to_string()
            }
        );
    }
}
