use crate::core::models::error::SpeciesError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Structural edit failed: {source}")]
    Species {
        #[from]
        source: SpeciesError,
    },

    #[error("Edit would remove every atom of the system")]
    EmptyResult,
}
