//! Connectivity analysis over bond collections.
//!
//! The only algorithm here is [`BondAggregator`], which partitions bonds into
//! connected components ("islands"). Islands, molecules and supermolecules
//! are derived from its output rather than maintained incrementally.

pub mod aggregator;

pub use aggregator::BondAggregator;
