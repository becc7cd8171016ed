use super::params::VdwParam;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How per-class van der Waals parameters combine into pair parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CombinationRule {
    /// Arithmetic mean of radii, geometric mean of well depths.
    #[default]
    LorentzBerthelot,
    /// Geometric mean of both radii and well depths.
    Geometric,
    /// Sixth-power mean of radii; well depth scaled by the cube ratio of radii.
    WaldmanHagler,
}

impl CombinationRule {
    pub fn combine(self, a: &VdwParam, b: &VdwParam) -> VdwParam {
        match self {
            Self::LorentzBerthelot => VdwParam {
                radius: (a.radius + b.radius) / 2.0,
                well_depth: (a.well_depth * b.well_depth).sqrt(),
            },
            Self::Geometric => VdwParam {
                radius: (a.radius * b.radius).sqrt(),
                well_depth: (a.well_depth * b.well_depth).sqrt(),
            },
            Self::WaldmanHagler => {
                let (ra3, rb3) = (a.radius.powi(3), b.radius.powi(3));
                let sum6 = ra3 * ra3 + rb3 * rb3;
                if sum6 <= 0.0 {
                    return VdwParam {
                        radius: 0.0,
                        well_depth: 0.0,
                    };
                }
                VdwParam {
                    radius: (sum6 / 2.0).powf(1.0 / 6.0),
                    well_depth: 2.0 * (a.well_depth * b.well_depth).sqrt() * ra3 * rb3 / sum6,
                }
            }
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown combination rule '{0}' (expected lorentz-berthelot, geometric or waldman-hagler)")]
pub struct ParseCombinationRuleError(String);

impl FromStr for CombinationRule {
    type Err = ParseCombinationRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lorentz-berthelot" | "lb" => Ok(Self::LorentzBerthelot),
            "geometric" => Ok(Self::Geometric),
            "waldman-hagler" | "wh" => Ok(Self::WaldmanHagler),
            _ => Err(ParseCombinationRuleError(s.to_string())),
        }
    }
}

impl fmt::Display for CombinationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LorentzBerthelot => "lorentz-berthelot",
            Self::Geometric => "geometric",
            Self::WaldmanHagler => "waldman-hagler",
        })
    }
}
