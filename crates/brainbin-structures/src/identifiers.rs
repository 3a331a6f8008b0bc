use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigurationError;

/// Cortical hemisphere. Each hemisphere is converted independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hemisphere {
    #[serde(rename = "lh")]
    Left,
    #[serde(rename = "rh")]
    Right,
}

impl Hemisphere {
    pub const ALL: [Hemisphere; 2] = [Hemisphere::Left, Hemisphere::Right];

    /// Short code used in file names ("lh" or "rh").
    pub fn as_str(&self) -> &'static str {
        match self {
            Hemisphere::Left => "lh",
            Hemisphere::Right => "rh",
        }
    }

    /// Full word used in metadata sidecars ("left" or "right").
    pub fn full_name(&self) -> &'static str {
        match self {
            Hemisphere::Left => "left",
            Hemisphere::Right => "right",
        }
    }
}

/// Model design whose results are being converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Analysis {
    #[serde(rename = "des1")]
    Design1,
    #[serde(rename = "des2")]
    Design2,
    #[serde(rename = "compare")]
    Compare,
}

impl Analysis {
    pub const ALL: [Analysis; 3] = [Analysis::Design1, Analysis::Design2, Analysis::Compare];

    /// Code used in file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Analysis::Design1 => "des1",
            Analysis::Design2 => "des2",
            Analysis::Compare => "compare",
        }
    }

    /// Statistics produced by this analysis, in conversion order.
    pub fn statistics(&self) -> Vec<Statistic> {
        Statistic::ALL
            .into_iter()
            .filter(|statistic| match self {
                Analysis::Compare => statistic.is_compare_only(),
                Analysis::Design1 | Analysis::Design2 => statistic.is_design_stat(),
            })
            .collect()
    }
}

/// Statistic kind stored in one `.dat` file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Statistic {
    #[serde(rename = "conT")]
    TStat,
    #[serde(rename = "conTlp")]
    LogP,
    #[serde(rename = "beta")]
    Beta,
    #[serde(rename = "sigma2")]
    Sigma2,
    /// Chi-squared statistic (model comparison only)
    #[serde(rename = "Chi2")]
    Chi2,
    /// -log10(p) for Chi-squared (model comparison only)
    #[serde(rename = "Chi2lp")]
    Chi2lp,
}

impl Statistic {
    pub const ALL: [Statistic; 6] = [
        Statistic::TStat,
        Statistic::LogP,
        Statistic::Beta,
        Statistic::Sigma2,
        Statistic::Chi2,
        Statistic::Chi2lp,
    ];

    /// Code used in file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Statistic::TStat => "conT",
            Statistic::LogP => "conTlp",
            Statistic::Beta => "beta",
            Statistic::Sigma2 => "sigma2",
            Statistic::Chi2 => "Chi2",
            Statistic::Chi2lp => "Chi2lp",
        }
    }

    /// Number of volumes the model is expected to write for this statistic.
    ///
    /// Only used to warn when a converted file disagrees; the file itself is authoritative.
    pub fn expected_volumes(&self) -> usize {
        match self {
            Statistic::TStat | Statistic::LogP => 5,
            Statistic::Beta => 23,
            Statistic::Sigma2 | Statistic::Chi2 | Statistic::Chi2lp => 1,
        }
    }

    pub fn is_compare_only(&self) -> bool {
        matches!(self, Statistic::Chi2 | Statistic::Chi2lp)
    }

    pub fn is_design_stat(&self) -> bool {
        !self.is_compare_only()
    }
}

macro_rules! impl_code_conversions {
    ($ty:ident, $kind:literal) => {
        impl Display for $ty {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ConfigurationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $ty::ALL
                    .into_iter()
                    .find(|candidate| candidate.as_str() == s)
                    .ok_or_else(|| ConfigurationError::UnknownIdentifier {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

impl_code_conversions!(Hemisphere, "hemisphere");
impl_code_conversions!(Analysis, "analysis");
impl_code_conversions!(Statistic, "statistic");
