//! Provides input/output functionality for chemical file formats.
//!
//! Readers parse flat atom and bond records and hand them to
//! [`Supermolecule::from_parts`](crate::core::models::supermolecule::Supermolecule::from_parts),
//! which recovers the island structure. Writers walk the islands in order, so a
//! file read from one format and written to another keeps its molecules apart.

pub mod error;
pub mod mol2;
pub mod pdb;
pub mod traits;

pub use error::{FileError, Format};
pub use mol2::Mol2File;
pub use pdb::PdbFile;
pub use traits::MolecularFile;
