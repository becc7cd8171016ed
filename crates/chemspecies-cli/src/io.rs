use crate::error::{CliError, Result};
use chemspecies::core::io::mol2::Mol2Metadata;
use chemspecies::core::io::pdb::PdbMetadata;
use chemspecies::core::io::{FileError, Format, MolecularFile, Mol2File, PdbFile};
use chemspecies::core::models::supermolecule::Supermolecule;
use std::path::Path;
use tracing::info;

/// Format-specific records kept from the input file.
#[derive(Debug)]
pub enum Metadata {
    Mol2(Mol2Metadata),
    Pdb(PdbMetadata),
}

fn format_of(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| CliError::UnsupportedFormat(path.to_path_buf()))
}

fn file_error(path: &Path) -> impl FnOnce(FileError) -> CliError + '_ {
    move |source| CliError::File {
        path: path.to_path_buf(),
        source,
    }
}

pub fn read_structure(path: &Path) -> Result<(Supermolecule, Metadata)> {
    let format = format_of(path)?;
    info!("Loading {} structure from {:?}", format, path);
    match format {
        Format::Mol2 => Mol2File::read_from_path(path)
            .map(|(system, metadata)| (system, Metadata::Mol2(metadata)))
            .map_err(file_error(path)),
        Format::Pdb => PdbFile::read_from_path(path)
            .map(|(system, metadata)| (system, Metadata::Pdb(metadata)))
            .map_err(file_error(path)),
    }
}

/// Writes `system` in the format implied by `path`. Metadata is reused when
/// the input had the same format; otherwise labels are generated.
pub fn write_structure(system: &Supermolecule, metadata: &Metadata, path: &Path) -> Result<()> {
    let format = format_of(path)?;
    info!("Writing {} structure to {:?}", format, path);
    match (format, metadata) {
        (Format::Mol2, Metadata::Mol2(metadata)) => {
            Mol2File::write_to_path(system, metadata, path)
        }
        (Format::Pdb, Metadata::Pdb(metadata)) => PdbFile::write_to_path(system, metadata, path),
        (Format::Mol2, _) => Mol2File::write_system_to_path(system, path),
        (Format::Pdb, _) => PdbFile::write_system_to_path(system, path),
    }
    .map_err(file_error(path))
}

/// A water molecule and a sodium ion in two MOLECULE blocks.
#[cfg(test)]
pub(crate) const WATER_AND_ION_MOL2: &str = "\
@<TRIPOS>MOLECULE
WAT
 3 2 1 0 0
SMALL
USER_CHARGES

@<TRIPOS>ATOM
  1 O1          0.0000    0.0000    0.0000 O.3     1  WAT        -0.8000
  2 H1          0.9572    0.0000    0.0000 H       1  WAT         0.4000
  3 H2         -0.2400    0.9266    0.0000 H       1  WAT         0.4000
@<TRIPOS>BOND
 1     1     2    1
 2     1     3    1
@<TRIPOS>MOLECULE
NA
 1 0 1 0 0
SMALL
USER_CHARGES

@<TRIPOS>ATOM
  1 NA          4.0000    0.0000    0.0000 Na      1  NA          1.0000
";

#[cfg(test)]
mod tests {
    use super::*;
    use chemspecies::core::models::fragment::Species;
    use std::path::PathBuf;

    fn write_input(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, WATER_AND_ION_MOL2).unwrap();
        path
    }

    #[test]
    fn reads_mol2_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_input(dir.path(), "system.mol2");

        let (system, metadata) = read_structure(&path).unwrap();

        assert_eq!(system.atom_count(), 4);
        assert_eq!(system.island_count(), 2);
        assert!(matches!(metadata, Metadata::Mol2(_)));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_input(dir.path(), "system.xyz");

        assert!(matches!(
            read_structure(&path),
            Err(CliError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn converts_between_formats() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "system.mol2");
        let output = dir.path().join("system.pdb");

        let (system, metadata) = read_structure(&input).unwrap();
        write_structure(&system, &metadata, &output).unwrap();
        let (reread, reread_metadata) = read_structure(&output).unwrap();

        assert_eq!(reread.atom_count(), 4);
        assert_eq!(reread.bond_count(), 2);
        assert_eq!(reread.island_count(), 2);
        assert!(matches!(reread_metadata, Metadata::Pdb(_)));
    }

    #[test]
    fn missing_input_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.pdb");

        let err = read_structure(&path).unwrap_err();
        assert!(matches!(err, CliError::File { .. }));
        assert!(err.to_string().contains("absent.pdb"));
    }
}
