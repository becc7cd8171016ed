//! Unit-of-measure conversion and small geometry helpers over atoms.

pub mod geometry;
pub mod units;
