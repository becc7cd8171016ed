use chemspecies::core::forcefield::nonbonded::EnergyError;
use chemspecies::core::forcefield::params::ParamLoadError;
use chemspecies::core::io::FileError;
use chemspecies::core::models::error::SpeciesError;
use chemspecies::workflows::{ConfigError, WorkflowError};
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to process file '{path}': {source}", path = path.display())]
    File {
        path: PathBuf,
        #[source]
        source: FileError,
    },

    #[error("Unsupported file format for '{}' (expected .mol2 or .pdb)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Failed to parse configuration file '{path}': {source}", path = path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Params(#[from] ParamLoadError),

    #[error("Energy evaluation failed: {0}")]
    Energy(#[from] EnergyError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Species(#[from] SpeciesError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
