use super::combination::CombinationRule;
use crate::core::utils::units::{EnergyUnit, LengthUnit, convert};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Van der Waals parameters of one atom class, in Å and kcal/mol.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct VdwParam {
    /// Equilibrium (minimum-energy) distance.
    pub radius: f64,
    pub well_depth: f64,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct GlobalParams {
    #[serde(default)]
    pub combination_rule: CombinationRule,
    /// Unit of every `radius` in the file.
    #[serde(default)]
    pub length_unit: LengthUnit,
    /// Unit of every `well-depth` in the file.
    #[serde(default)]
    pub energy_unit: EnergyUnit,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawVdwTable {
    #[serde(default)]
    globals: GlobalParams,
    vdw: HashMap<String, VdwParam>,
}

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid parameter for class '{class}' in '{path}': {details}")]
    Invalid {
        path: String,
        class: String,
        details: String,
    },
}

/// Per-class van der Waals parameters plus the rule that combines them.
#[derive(Debug, Clone, PartialEq)]
pub struct VdwTable {
    combination_rule: CombinationRule,
    params: HashMap<String, VdwParam>,
}

impl VdwTable {
    pub fn new(combination_rule: CombinationRule, params: HashMap<String, VdwParam>) -> Self {
        Self {
            combination_rule,
            params,
        }
    }

    /// Loads a table from a TOML file, converting values to Å and kcal/mol.
    pub fn load(path: &Path) -> Result<Self, ParamLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ParamLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.to_string_lossy())
    }

    /// Parses TOML content; `origin` names the source in error messages.
    pub fn parse(content: &str, origin: &str) -> Result<Self, ParamLoadError> {
        let raw: RawVdwTable = toml::from_str(content).map_err(|e| ParamLoadError::Toml {
            path: origin.to_string(),
            source: e,
        })?;
        let GlobalParams {
            combination_rule,
            length_unit,
            energy_unit,
        } = raw.globals;

        let mut params = HashMap::with_capacity(raw.vdw.len());
        for (class, param) in raw.vdw {
            let radius_ok = param.radius.is_finite() && param.radius > 0.0;
            let depth_ok = param.well_depth.is_finite() && param.well_depth >= 0.0;
            if !radius_ok || !depth_ok {
                return Err(ParamLoadError::Invalid {
                    path: origin.to_string(),
                    class,
                    details: "radius must be finite and positive, well-depth finite and non-negative"
                        .to_string(),
                });
            }
            params.insert(
                class,
                VdwParam {
                    radius: convert(param.radius, length_unit, LengthUnit::Angstrom),
                    well_depth: convert(param.well_depth, energy_unit, EnergyUnit::KcalPerMol),
                },
            );
        }

        debug!(
            classes = params.len(),
            rule = %combination_rule,
            "Loaded van der Waals parameters"
        );
        Ok(Self::new(combination_rule, params))
    }

    pub fn combination_rule(&self) -> CombinationRule {
        self.combination_rule
    }

    pub fn get(&self, class: &str) -> Option<&VdwParam> {
        self.params.get(class)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Combined parameters for a pair of classes, if both are known.
    pub fn pair(&self, first: &str, second: &str) -> Option<VdwParam> {
        let a = self.params.get(first)?;
        let b = self.params.get(second)?;
        Some(self.combination_rule.combine(a, b))
    }
}
