use super::atom::Atom;
use super::error::SpeciesError;
use super::fragment::{Fragment, Species};
use super::ids::AtomId;
use super::supermolecule::Supermolecule;
use std::collections::HashMap;

/// A supermolecule together with a partition of its atoms into fragments.
///
/// Energy evaluators use the partition to decide which atom pairs interact:
/// only pairs whose atoms fall into different fragments are considered.
#[derive(Debug, Clone)]
pub struct FragmentedSupermolecule {
    supermolecule: Supermolecule,
    fragments: Vec<Fragment>,
    fragment_by_atom: HashMap<AtomId, usize>,
}

impl FragmentedSupermolecule {
    /// # Errors
    ///
    /// * [`SpeciesError::AtomNotFound`] if a fragment holds an atom outside
    ///   the supermolecule.
    /// * [`SpeciesError::SharedAtom`] if two fragments hold the same atom.
    /// * [`SpeciesError::UncoveredAtoms`] if some atoms of the supermolecule
    ///   belong to no fragment.
    pub fn new(supermolecule: Supermolecule, fragments: Vec<Fragment>) -> Result<Self, SpeciesError> {
        let mut fragment_by_atom = HashMap::with_capacity(supermolecule.atom_count());

        for (position, fragment) in fragments.iter().enumerate() {
            for atom in fragment.iter() {
                if !supermolecule.contains_atom(atom) {
                    return Err(SpeciesError::AtomNotFound(atom.id()));
                }
                if fragment_by_atom.insert(atom.id(), position).is_some() {
                    return Err(SpeciesError::SharedAtom(atom.id()));
                }
            }
        }

        let uncovered = supermolecule.atom_count() - fragment_by_atom.len();
        if uncovered > 0 {
            return Err(SpeciesError::UncoveredAtoms { count: uncovered });
        }

        Ok(Self {
            supermolecule,
            fragments,
            fragment_by_atom,
        })
    }

    /// Uses every island of `supermolecule` as its own fragment.
    pub fn by_islands(supermolecule: Supermolecule) -> Result<Self, SpeciesError> {
        let fragments = supermolecule
            .subspecies()
            .iter()
            .map(|island| Fragment::new(island.atoms().iter().cloned()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(supermolecule, fragments)
    }

    pub fn supermolecule(&self) -> &Supermolecule {
        &self.supermolecule
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn fragment_of(&self, atom: &Atom) -> Option<&Fragment> {
        self.fragment_by_atom
            .get(&atom.id())
            .map(|&position| &self.fragments[position])
    }

    /// Every unordered pair of atoms belonging to different fragments.
    ///
    /// Pairs are yielded once each, following fragment order and then atom
    /// order within a fragment.
    pub fn cross_atom_pairs(&self) -> impl Iterator<Item = (&Atom, &Atom)> + '_ {
        self.fragments.iter().enumerate().flat_map(move |(i, first)| {
            self.fragments[i + 1..].iter().flat_map(move |second| {
                first
                    .iter()
                    .flat_map(move |a| second.iter().map(move |b| (a, b)))
            })
        })
    }

    pub fn cross_pair_count(&self) -> usize {
        let sizes: Vec<usize> = self.fragments.iter().map(Fragment::len).collect();
        let total: usize = sizes.iter().sum();
        let within: usize = sizes.iter().map(|n| n * n).sum();
        (total * total - within) / 2
    }
}
