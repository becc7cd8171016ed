//! # Core Models Module
//!
//! This module contains the immutable species model: atoms, bonds and the
//! connected components ("islands") they form inside a complete chemical system.
//!
//! ## Overview
//!
//! Every entity carries a referential identity. Two atoms at the same position
//! with the same element are still distinct, and structural edits never mutate
//! anything in place; they return new values built from shared handles.
//!
//! - **Represent chemical systems** - Molecules, lone ions and their union as a [`Supermolecule`](supermolecule::Supermolecule)
//! - **Guard consistency** - Constructors validate that no atom belongs to two islands and that every molecule is connected
//! - **Derive structure from bonds** - Island partitioning is recovered by [`BondAggregator`](crate::core::graph::BondAggregator)
//!
//! ## Key Components
//!
//! - [`ids`] - Identity newtypes and the [`Identified`](ids::Identified) trait
//! - [`element`] - The periodic table with case-insensitive symbol lookup
//! - [`atom`] - Identity-bearing atoms with position, optional charge and tag
//! - [`bond`] - Typed bonds between two distinct atoms
//! - [`fragment`] - The [`Species`](fragment::Species) trait and plain atom fragments
//! - [`aggregate`] - Generic containers of referentially distinct members
//! - [`island`] - Atom islands, molecules and the closed [`Island`](island::Island) variant
//! - [`supermolecule`] - The root aggregate and its edit operations
//! - [`fragmented`] - A supermolecule partitioned into fragments for energy evaluation
//! - [`error`] - Validation failures of the model
//!
//! ## Usage
//!
//! ```
//! use chemspecies::core::models::prelude::*;
//! use nalgebra::Point3;
//!
//! let o = Atom::new(Element::O, Point3::origin());
//! let h = Atom::new(Element::H, Point3::new(0.96, 0.0, 0.0));
//! let na = Atom::new(Element::Na, Point3::new(5.0, 0.0, 0.0));
//! let oh = Bond::new(o.clone(), h.clone(), BondType::Single)?;
//!
//! let system = Supermolecule::from_parts(vec![o, h, na.clone()], vec![oh])?;
//! assert_eq!(system.islands().len(), 2);
//!
//! let without_ion = system.minus_atoms(&[na])?;
//! assert_eq!(without_ion.islands().len(), 1);
//! # Ok::<(), SpeciesError>(())
//! ```

pub mod aggregate;
pub mod atom;
pub mod bond;
pub mod element;
pub mod error;
pub mod fragment;
pub mod fragmented;
pub mod ids;
pub mod island;
pub mod supermolecule;

/// Re-exports of the types most callers need.
pub mod prelude {
    pub use super::aggregate::Aggregate;
    pub use super::atom::{Atom, AtomBuilder};
    pub use super::bond::{Bond, BondType};
    pub use super::element::Element;
    pub use super::error::SpeciesError;
    pub use super::fragment::{Fragment, Species};
    pub use super::fragmented::FragmentedSupermolecule;
    pub use super::ids::{AtomId, BondId, Identified, IslandId};
    pub use super::island::{AtomIsland, Island, Molecule};
    pub use super::supermolecule::Supermolecule;
}
