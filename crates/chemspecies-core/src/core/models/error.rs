use super::ids::{AtomId, BondId, IslandId};
use thiserror::Error;

/// Validation failures raised by the species model.
///
/// Every variant describes a deterministic problem with the input graph, so
/// none of them are worth retrying.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpeciesError {
    #[error("bond {0} is listed more than once")]
    DuplicateBond(BondId),

    #[error("bonds {first} and {second} both join {atom1} and {atom2}")]
    ConflictingBondPair {
        first: BondId,
        second: BondId,
        atom1: AtomId,
        atom2: AtomId,
    },

    #[error("a bond cannot join {0} to itself")]
    SelfBond(AtomId),

    #[error("a molecule requires at least one bond")]
    EmptyMolecule,

    #[error("collection of bonds represents {components} molecules, expected exactly one")]
    DisconnectedMolecule { components: usize },

    #[error("{0} appears in more than one island or fragment")]
    SharedAtom(AtomId),

    #[error("{0} is listed more than once")]
    DuplicateAtom(AtomId),

    #[error("{0} is listed more than once in the aggregate")]
    DuplicateMember(String),

    #[error("a fragment requires at least one atom")]
    EmptyFragment,

    #[error("{0} does not exist in this species")]
    AtomNotFound(AtomId),

    #[error("{0} does not exist in this species")]
    BondNotFound(BondId),

    #[error("{0} does not exist in this species")]
    IslandNotFound(IslandId),

    #[error("{0} is not a member of the aggregate")]
    MemberNotFound(String),

    #[error("mapper yielded referentially equal atoms for {first} and {second}")]
    MappingCollision { first: AtomId, second: AtomId },

    #[error("fragmentation leaves {count} atom(s) uncovered")]
    UncoveredAtoms { count: usize },
}
