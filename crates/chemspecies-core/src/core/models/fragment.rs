use super::atom::Atom;
use super::bond::Bond;
use super::error::SpeciesError;
use super::ids::AtomId;
use std::collections::HashSet;

/// Common read-only view over anything made of atoms.
pub trait Species {
    /// The atoms of this species, each listed once.
    fn atoms(&self) -> &[Atom];

    /// The bonds internal to this species.
    fn bonds(&self) -> &[Bond];

    fn atom_count(&self) -> usize {
        self.atoms().len()
    }

    fn bond_count(&self) -> usize {
        self.bonds().len()
    }

    fn contains_atom(&self, atom: &Atom) -> bool {
        self.atoms().iter().any(|a| a == atom)
    }

    /// Total charge rounded to the nearest integer.
    ///
    /// Returns `None` when any atom has an unknown charge: the total cannot be
    /// determined, which is not the same as a neutral species.
    fn charge(&self) -> Option<i32> {
        let mut total = 0.0;
        for atom in self.atoms() {
            total += atom.charge()?;
        }
        Some(total.round() as i32)
    }
}

/// A non-empty, ordered collection of referentially distinct atoms.
#[derive(Debug, Clone)]
pub struct Fragment {
    atoms: Vec<Atom>,
    index: HashSet<AtomId>,
}

impl Fragment {
    /// # Errors
    ///
    /// [`SpeciesError::EmptyFragment`] for an empty input and
    /// [`SpeciesError::DuplicateAtom`] if any atom is listed twice.
    pub fn new(atoms: impl IntoIterator<Item = Atom>) -> Result<Self, SpeciesError> {
        let atoms: Vec<Atom> = atoms.into_iter().collect();
        if atoms.is_empty() {
            return Err(SpeciesError::EmptyFragment);
        }
        let mut index = HashSet::with_capacity(atoms.len());
        for atom in &atoms {
            if !index.insert(atom.id()) {
                return Err(SpeciesError::DuplicateAtom(atom.id()));
            }
        }
        Ok(Self { atoms, index })
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn contains(&self, atom: &Atom) -> bool {
        self.index.contains(&atom.id())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Atom> {
        self.atoms.iter()
    }
}

impl Species for Fragment {
    fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// A bare fragment carries no bonds of its own.
    fn bonds(&self) -> &[Bond] {
        &[]
    }

    fn contains_atom(&self, atom: &Atom) -> bool {
        self.contains(atom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::element::Element;
    use nalgebra::Point3;

    fn atom() -> Atom {
        Atom::new(Element::C, Point3::origin())
    }

    #[test]
    fn fragment_keeps_atom_order() {
        let (a, b, c) = (atom(), atom(), atom());
        let fragment = Fragment::new([c.clone(), a.clone(), b.clone()]).unwrap();

        assert_eq!(fragment.atoms(), &[c, a.clone(), b]);
        assert_eq!(fragment.len(), 3);
        assert!(fragment.contains(&a));
        assert!(!fragment.contains(&atom()));
        assert_eq!(fragment.bond_count(), 0);
    }

    #[test]
    fn fragment_rejects_empty_input() {
        assert_eq!(
            Fragment::new(Vec::new()).unwrap_err(),
            SpeciesError::EmptyFragment
        );
    }

    #[test]
    fn fragment_rejects_repeated_atoms() {
        let a = atom();
        let result = Fragment::new([a.clone(), atom(), a.clone()]);
        assert_eq!(result.unwrap_err(), SpeciesError::DuplicateAtom(a.id()));
    }
}
