//! # Core Module
//!
//! The species model and everything that reads, writes or scores it.
//!
//! ## Architecture
//!
//! - **Species Model** ([`models`]) - Atoms, bonds, islands and supermolecules with referential identity
//! - **Connectivity** ([`graph`]) - Bond aggregation into connected components
//! - **File I/O** ([`io`]) - Mol2 and PDB readers and writers
//! - **Energy Calculations** ([`forcefield`]) - Van der Waals parameters and pairwise evaluation
//! - **Utilities** ([`utils`]) - Unit conversion and geometry helpers
//!
//! Every type in this module is immutable once built. Edits return new values,
//! so a `Supermolecule` can be shared freely between threads and callers.

pub mod forcefield;
pub mod graph;
pub mod io;
pub mod models;
pub mod utils;
