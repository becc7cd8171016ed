use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A unit that converts linearly to a fixed reference unit of its dimension.
pub trait Unit: Copy {
    /// How many reference units one of this unit is worth.
    fn factor(self) -> f64;
}

/// Converts `value` between two units of the same dimension.
pub fn convert<U: Unit>(value: f64, from: U, to: U) -> f64 {
    value * from.factor() / to.factor()
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown {dimension} unit '{symbol}'")]
pub struct ParseUnitError {
    dimension: &'static str,
    symbol: String,
}

/// Length units; the reference unit is the Ångström.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum LengthUnit {
    #[default]
    Angstrom,
    Nanometer,
    Picometer,
    Bohr,
}

impl Unit for LengthUnit {
    fn factor(self) -> f64 {
        match self {
            Self::Angstrom => 1.0,
            Self::Nanometer => 10.0,
            Self::Picometer => 0.01,
            Self::Bohr => 0.529_177_210_903,
        }
    }
}

impl FromStr for LengthUnit {
    type Err = ParseUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "Å" | "angstrom" | "Angstrom" => Ok(Self::Angstrom),
            "nm" | "nanometer" => Ok(Self::Nanometer),
            "pm" | "picometer" => Ok(Self::Picometer),
            "bohr" | "a0" => Ok(Self::Bohr),
            other => Err(ParseUnitError {
                dimension: "length",
                symbol: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for LengthUnit {
    type Error = ParseUnitError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Angstrom => "Å",
            Self::Nanometer => "nm",
            Self::Picometer => "pm",
            Self::Bohr => "bohr",
        })
    }
}

/// Molar energy units; the reference unit is kcal/mol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum EnergyUnit {
    #[default]
    KcalPerMol,
    KjPerMol,
    Hartree,
    ElectronVolt,
}

impl Unit for EnergyUnit {
    fn factor(self) -> f64 {
        match self {
            Self::KcalPerMol => 1.0,
            Self::KjPerMol => 1.0 / 4.184,
            Self::Hartree => 627.509_474,
            Self::ElectronVolt => 23.060_548,
        }
    }
}

impl FromStr for EnergyUnit {
    type Err = ParseUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kcal/mol" | "kcal" => Ok(Self::KcalPerMol),
            "kj/mol" | "kj" => Ok(Self::KjPerMol),
            "hartree" | "eh" | "ha" => Ok(Self::Hartree),
            "ev" => Ok(Self::ElectronVolt),
            _ => Err(ParseUnitError {
                dimension: "energy",
                symbol: s.trim().to_string(),
            }),
        }
    }
}

impl TryFrom<String> for EnergyUnit {
    type Error = ParseUnitError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for EnergyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::KcalPerMol => "kcal/mol",
            Self::KjPerMol => "kJ/mol",
            Self::Hartree => "hartree",
            Self::ElectronVolt => "eV",
        })
    }
}
