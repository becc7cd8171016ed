use crate::core::models::error::SpeciesError;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Supported chemical file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Mol2,
    Pdb,
}

impl Format {
    /// Infers the format from a file extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "mol2" | "ml2" => Some(Self::Mol2),
            "pdb" | "ent" => Some(Self::Pdb),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mol2 => "MOL2",
            Self::Pdb => "PDB",
        })
    }
}

#[derive(Debug, Error)]
pub enum FileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse {format} data on line {line}: {details}")]
    Parse {
        format: Format,
        line: usize,
        details: String,
    },

    #[error("Missing required {format} record: {record}")]
    MissingRecord { format: Format, record: String },

    #[error("Structure cannot be written as {format}: {details}")]
    Unrepresentable { format: Format, details: String },

    #[error("Structure is not a valid species: {0}")]
    Species(#[from] SpeciesError),
}

impl FileError {
    pub fn parse(format: Format, line: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            format,
            line,
            details: details.into(),
        }
    }

    pub fn missing(format: Format, record: impl Into<String>) -> Self {
        Self::MissingRecord {
            format,
            record: record.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_is_inferred_from_extension() {
        assert_eq!(Format::from_path(Path::new("ligand.MOL2")), Some(Format::Mol2));
        assert_eq!(Format::from_path(Path::new("/tmp/1abc.pdb")), Some(Format::Pdb));
        assert_eq!(Format::from_path(Path::new("complex.ent")), Some(Format::Pdb));
        assert_eq!(Format::from_path(Path::new("notes.txt")), None);
        assert_eq!(Format::from_path(Path::new("no_extension")), None);
    }

    #[test]
    fn parse_error_mentions_format_and_line() {
        let err = FileError::parse(Format::Mol2, 12, "invalid x coordinate");
        assert_eq!(
            err.to_string(),
            "Failed to parse MOL2 data on line 12: invalid x coordinate"
        );
    }
}
