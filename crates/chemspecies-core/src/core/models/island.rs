use super::atom::Atom;
use super::bond::Bond;
use super::error::SpeciesError;
use super::fragment::Species;
use super::ids::{AtomId, Identified, IslandId};
use crate::core::graph::BondAggregator;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// An island made of a single unbonded atom.
///
/// The island's identity is derived from its atom, so wrapping the same atom
/// twice yields the same island.
#[derive(Clone)]
pub struct AtomIsland {
    atom: Atom,
}

impl AtomIsland {
    pub fn new(atom: Atom) -> Self {
        Self { atom }
    }

    pub fn id(&self) -> IslandId {
        IslandId::from(self.atom.id())
    }

    pub fn atom(&self) -> &Atom {
        &self.atom
    }
}

impl Species for AtomIsland {
    fn atoms(&self) -> &[Atom] {
        std::slice::from_ref(&self.atom)
    }

    fn bonds(&self) -> &[Bond] {
        &[]
    }

    fn contains_atom(&self, atom: &Atom) -> bool {
        self.atom == *atom
    }
}

impl fmt::Debug for AtomIsland {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomIsland")
            .field("id", &self.id())
            .field("atom", &self.atom)
            .finish()
    }
}

#[derive(Debug)]
struct MoleculeData {
    id: IslandId,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    /// Positions in `bonds` of the bonds touching each atom.
    bonds_by_atom: HashMap<AtomId, Vec<usize>>,
}

/// A connected, multi-atom island.
///
/// A molecule is defined by its bonds; its atoms are exactly the atoms those
/// bonds reference, in order of first appearance.
#[derive(Clone)]
pub struct Molecule(Arc<MoleculeData>);

impl Molecule {
    /// Builds a molecule from a connected set of bonds.
    ///
    /// # Errors
    ///
    /// * [`SpeciesError::EmptyMolecule`] if `bonds` is empty.
    /// * [`SpeciesError::DisconnectedMolecule`] if the bonds form more than one
    ///   connected component.
    /// * Any error of [`BondAggregator::aggregate`] (repeated bonds, two bonds
    ///   on the same atom pair).
    pub fn new(bonds: Vec<Bond>) -> Result<Self, SpeciesError> {
        if bonds.is_empty() {
            return Err(SpeciesError::EmptyMolecule);
        }
        let components = BondAggregator::aggregate(&bonds)?.len();
        if components != 1 {
            return Err(SpeciesError::DisconnectedMolecule { components });
        }
        Ok(Self::from_connected_bonds(bonds))
    }

    /// Builds a molecule from bonds already known to be one valid component,
    /// e.g. a single output list of [`BondAggregator::aggregate`].
    pub(crate) fn from_connected_bonds(bonds: Vec<Bond>) -> Self {
        let mut atoms = Vec::new();
        let mut bonds_by_atom: HashMap<AtomId, Vec<usize>> = HashMap::new();

        for (bond_idx, bond) in bonds.iter().enumerate() {
            for atom in [bond.atom1(), bond.atom2()] {
                let entry = bonds_by_atom.entry(atom.id()).or_default();
                if entry.is_empty() {
                    atoms.push(atom.clone());
                }
                entry.push(bond_idx);
            }
        }

        Self(Arc::new(MoleculeData {
            id: IslandId::fresh(),
            atoms,
            bonds,
            bonds_by_atom,
        }))
    }

    pub fn id(&self) -> IslandId {
        self.0.id
    }

    /// All bonds touching `atom`; empty if the atom is not in this molecule.
    pub fn bonds_by_atom(&self, atom: &Atom) -> Vec<&Bond> {
        self.0
            .bonds_by_atom
            .get(&atom.id())
            .map(|indices| indices.iter().map(|&i| &self.0.bonds[i]).collect())
            .unwrap_or_default()
    }

    /// The bond joining `atom1` and `atom2`, in either direction.
    pub fn get_bond(&self, atom1: &Atom, atom2: &Atom) -> Option<&Bond> {
        let first = self.0.bonds_by_atom.get(&atom1.id())?;
        let second = self.0.bonds_by_atom.get(&atom2.id())?;
        let (shorter, longer) = if first.len() <= second.len() {
            (first, second)
        } else {
            (second, first)
        };

        shorter
            .iter()
            .copied()
            .filter(|idx| longer.contains(idx))
            .map(|idx| &self.0.bonds[idx])
            .find(|bond| bond.contains(atom1) && bond.contains(atom2))
    }

    /// Atoms bonded to `atom` within this molecule.
    pub fn neighbors(&self, atom: &Atom) -> Vec<&Atom> {
        self.bonds_by_atom(atom)
            .into_iter()
            .filter_map(|bond| bond.other(atom))
            .collect()
    }
}

impl Species for Molecule {
    fn atoms(&self) -> &[Atom] {
        &self.0.atoms
    }

    fn bonds(&self) -> &[Bond] {
        &self.0.bonds
    }

    fn contains_atom(&self, atom: &Atom) -> bool {
        self.0.bonds_by_atom.contains_key(&atom.id())
    }
}

impl fmt::Debug for Molecule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Molecule")
            .field("id", &self.0.id)
            .field("atoms", &self.0.atoms.len())
            .field("bonds", &self.0.bonds)
            .finish()
    }
}

/// A maximal connected component of the bond graph.
#[derive(Debug, Clone)]
pub enum Island {
    Atom(AtomIsland),
    Molecule(Molecule),
}

impl Island {
    pub fn id(&self) -> IslandId {
        match self {
            Island::Atom(island) => island.id(),
            Island::Molecule(molecule) => molecule.id(),
        }
    }

    pub fn is_molecule(&self) -> bool {
        matches!(self, Island::Molecule(_))
    }

    pub fn as_molecule(&self) -> Option<&Molecule> {
        match self {
            Island::Molecule(molecule) => Some(molecule),
            Island::Atom(_) => None,
        }
    }

    pub fn as_atom_island(&self) -> Option<&AtomIsland> {
        match self {
            Island::Atom(island) => Some(island),
            Island::Molecule(_) => None,
        }
    }
}

impl Species for Island {
    fn atoms(&self) -> &[Atom] {
        match self {
            Island::Atom(island) => island.atoms(),
            Island::Molecule(molecule) => molecule.atoms(),
        }
    }

    fn bonds(&self) -> &[Bond] {
        match self {
            Island::Atom(island) => island.bonds(),
            Island::Molecule(molecule) => molecule.bonds(),
        }
    }

    fn contains_atom(&self, atom: &Atom) -> bool {
        match self {
            Island::Atom(island) => island.contains_atom(atom),
            Island::Molecule(molecule) => molecule.contains_atom(atom),
        }
    }
}

impl Identified for Island {
    type Id = IslandId;

    fn id(&self) -> IslandId {
        Island::id(self)
    }
}

impl PartialEq for Island {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Island {}

impl From<AtomIsland> for Island {
    fn from(island: AtomIsland) -> Self {
        Island::Atom(island)
    }
}

impl From<Molecule> for Island {
    fn from(molecule: Molecule) -> Self {
        Island::Molecule(molecule)
    }
}
