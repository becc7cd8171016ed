//! # Force Field Module
//!
//! Van der Waals parameters and the pairwise energy evaluation that consumes a
//! fragmented supermolecule.
//!
//! ## Overview
//!
//! Parameters are stored per atom class in a TOML table and combined into pair
//! parameters by a [`CombinationRule`](combination::CombinationRule). The
//! [`NonBondedEvaluator`](nonbonded::NonBondedEvaluator) sums a 12-6
//! Lennard-Jones potential over every atom pair that crosses a fragment
//! boundary, which makes the fragmentation the only exclusion mechanism.
//!
//! ## Key Components
//!
//! - [`params`] - Parameter tables loaded from TOML with unit conversion
//! - [`combination`] - Lorentz-Berthelot, geometric and Waldman-Hagler rules
//! - [`nonbonded`] - Energy evaluation over cross-fragment atom pairs
//!
//! ## Usage
//!
//! ```ignore
//! use chemspecies::core::forcefield::{nonbonded::{NonBondedEvaluator, classes_from_tags}, params::VdwTable};
//!
//! let table = VdwTable::load(Path::new("vdw.toml"))?;
//! let classes = classes_from_tags(&system);
//! let fragmented = FragmentedSupermolecule::by_islands(system)?;
//! let energy = NonBondedEvaluator::new(&table).evaluate(&fragmented, &classes)?;
//! ```

pub mod combination;
pub mod nonbonded;
pub mod params;
pub(crate) mod potentials;
