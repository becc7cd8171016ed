//! # Chemspecies Core Library
//!
//! An immutable, identity-based model of chemical species: atoms, bonds, the
//! connected islands they form and the supermolecules that group them.
//!
//! ## Architectural Philosophy
//!
//! The library is split into two layers so that the model stays small and the
//! procedures built on it stay replaceable.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Atom`, `Bond`,
//!   `Island`, `Supermolecule`), the bond aggregation algorithm that recovers
//!   islands from a flat bond list, Mol2/PDB I/O, and van der Waals energy
//!   evaluation over fragmented systems.
//!
//! - **[`workflows`]: The Public API.** Complete procedures, such as the edit
//!   pipeline, that chain core operations under a validated configuration.

pub mod core;
pub mod workflows;
