use crate::core::models::supermolecule::Supermolecule;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing chemical file formats.
///
/// Readers turn flat atom and bond records into a [`Supermolecule`], recovering
/// the island structure from the bonds. Writers walk the islands in order.
/// Format-specific details that have no place in the species model (atom names,
/// residue labels, header lines) travel in the associated `Metadata`.
pub trait MolecularFile {
    /// Format-specific data preserved between reading and writing.
    type Metadata;

    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads a supermolecule from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails, the records do not describe a valid
    /// species, or the reader fails.
    fn read_from(reader: &mut impl BufRead) -> Result<(Supermolecule, Self::Metadata), Self::Error>;

    /// Writes a supermolecule using the names and labels stored in `metadata`.
    ///
    /// Atoms without an entry in `metadata` fall back to generated labels.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(
        system: &Supermolecule,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    /// Writes a supermolecule with generated labels only.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_system_to(system: &Supermolecule, writer: &mut impl Write) -> Result<(), Self::Error>;

    fn read_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<(Supermolecule, Self::Metadata), Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    fn write_to_path<P: AsRef<Path>>(
        system: &Supermolecule,
        metadata: &Self::Metadata,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(system, metadata, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    fn write_system_to_path<P: AsRef<Path>>(
        system: &Supermolecule,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_system_to(system, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
