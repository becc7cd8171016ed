use super::aggregate::Aggregate;
use super::atom::Atom;
use super::bond::Bond;
use super::error::SpeciesError;
use super::fragment::Species;
use super::ids::{AtomId, BondId};
use super::island::{AtomIsland, Island, Molecule};
use crate::core::graph::BondAggregator;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// A complete chemical system: a set of islands whose atoms never overlap.
///
/// A `Supermolecule` is immutable. Structural edits (`minus_*`, `map`) return
/// a new instance and leave the receiver untouched; a failed edit produces
/// nothing.
#[derive(Debug, Clone)]
pub struct Supermolecule {
    islands: Aggregate<Island>,
    /// All atoms, island by island.
    atoms: Vec<Atom>,
    /// All bonds, island by island.
    bonds: Vec<Bond>,
    /// Position in `islands` of the island holding each atom.
    island_by_atom: HashMap<AtomId, usize>,
}

impl Supermolecule {
    /// Assembles a supermolecule from existing islands.
    ///
    /// # Errors
    ///
    /// * [`SpeciesError::DuplicateMember`] if an island is listed twice.
    /// * [`SpeciesError::SharedAtom`] if an atom belongs to more than one
    ///   island.
    pub fn new(islands: impl IntoIterator<Item = Island>) -> Result<Self, SpeciesError> {
        let islands = Aggregate::new(islands)?;

        let capacity: usize = islands.iter().map(|island| island.atom_count()).sum();
        let mut atoms = Vec::with_capacity(capacity);
        let mut bonds = Vec::new();
        let mut island_by_atom = HashMap::with_capacity(capacity);

        for (position, island) in islands.iter().enumerate() {
            for atom in island.atoms() {
                if island_by_atom.insert(atom.id(), position).is_some() {
                    return Err(SpeciesError::SharedAtom(atom.id()));
                }
                atoms.push(atom.clone());
            }
            bonds.extend_from_slice(island.bonds());
        }

        Ok(Self {
            islands,
            atoms,
            bonds,
            island_by_atom,
        })
    }

    /// Recovers the island structure of a flat atom and bond list.
    ///
    /// This is the entry point for format importers. Bonds are aggregated into
    /// molecules and every atom not referenced by a bond becomes an
    /// [`AtomIsland`]. Islands are ordered by the position of their first atom
    /// in `atoms`.
    ///
    /// # Errors
    ///
    /// * [`SpeciesError::DuplicateAtom`] if an atom is listed twice.
    /// * [`SpeciesError::AtomNotFound`] if a bond references an atom missing
    ///   from `atoms`.
    /// * Any error of [`BondAggregator::aggregate`].
    pub fn from_parts(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Result<Self, SpeciesError> {
        let mut known = HashSet::with_capacity(atoms.len());
        for atom in &atoms {
            if !known.insert(atom.id()) {
                return Err(SpeciesError::DuplicateAtom(atom.id()));
            }
        }
        for bond in &bonds {
            for atom in [bond.atom1(), bond.atom2()] {
                if !known.contains(&atom.id()) {
                    return Err(SpeciesError::AtomNotFound(atom.id()));
                }
            }
        }
        Self::assemble(&atoms, bonds)
    }

    /// Re-derives islands from scratch for a validated atom/bond population.
    fn assemble(atoms: &[Atom], bonds: Vec<Bond>) -> Result<Self, SpeciesError> {
        let rank: HashMap<AtomId, usize> = atoms
            .iter()
            .enumerate()
            .map(|(position, atom)| (atom.id(), position))
            .collect();

        let mut ranked: Vec<(usize, Island)> = Vec::new();
        let mut bonded: HashSet<AtomId> = HashSet::new();

        for component in BondAggregator::aggregate(&bonds)? {
            let molecule = Molecule::from_connected_bonds(component);
            let first = molecule
                .atoms()
                .iter()
                .filter_map(|atom| rank.get(&atom.id()))
                .min()
                .copied()
                .unwrap_or(usize::MAX);
            bonded.extend(molecule.atoms().iter().map(Atom::id));
            ranked.push((first, Island::Molecule(molecule)));
        }

        for (position, atom) in atoms.iter().enumerate() {
            if !bonded.contains(&atom.id()) {
                ranked.push((position, Island::Atom(atom.island())));
            }
        }

        ranked.sort_by_key(|(position, _)| *position);
        Self::new(ranked.into_iter().map(|(_, island)| island))
    }

    /// The islands of this system, in order.
    pub fn subspecies(&self) -> &[Island] {
        self.islands.members()
    }

    pub fn islands(&self) -> &[Island] {
        self.subspecies()
    }

    pub fn island_count(&self) -> usize {
        self.islands.len()
    }

    pub fn molecules(&self) -> impl Iterator<Item = &Molecule> {
        self.islands.iter().filter_map(Island::as_molecule)
    }

    pub fn atom_islands(&self) -> impl Iterator<Item = &AtomIsland> {
        self.islands.iter().filter_map(Island::as_atom_island)
    }

    pub fn contains_island(&self, island: &Island) -> bool {
        self.islands.contains(island)
    }

    /// The island holding `atom`, if the atom belongs to this system.
    pub fn island_of(&self, atom: &Atom) -> Option<&Island> {
        self.island_by_atom
            .get(&atom.id())
            .map(|&position| &self.islands.members()[position])
    }

    /// Removes `atoms` and every bond touching them, then re-derives islands.
    ///
    /// Atoms that lose all their bonds become atom islands alongside the
    /// pre-existing ones.
    ///
    /// # Errors
    ///
    /// [`SpeciesError::AtomNotFound`] if any atom is not part of this system.
    pub fn minus_atoms(&self, atoms: &[Atom]) -> Result<Self, SpeciesError> {
        let mut doomed = HashSet::with_capacity(atoms.len());
        for atom in atoms {
            if !self.island_by_atom.contains_key(&atom.id()) {
                return Err(SpeciesError::AtomNotFound(atom.id()));
            }
            doomed.insert(atom.id());
        }

        let remaining_atoms: Vec<Atom> = self
            .atoms
            .iter()
            .filter(|atom| !doomed.contains(&atom.id()))
            .cloned()
            .collect();
        let remaining_bonds: Vec<Bond> = self
            .bonds
            .iter()
            .filter(|bond| {
                !doomed.contains(&bond.atom1().id()) && !doomed.contains(&bond.atom2().id())
            })
            .cloned()
            .collect();

        debug!(
            removed_atoms = doomed.len(),
            removed_bonds = self.bonds.len() - remaining_bonds.len(),
            "Removing atoms from supermolecule"
        );
        Self::assemble(&remaining_atoms, remaining_bonds)
    }

    /// Removes `bonds` (by identity), keeping all atoms, then re-derives
    /// islands.
    ///
    /// # Errors
    ///
    /// [`SpeciesError::BondNotFound`] if any bond is not part of this system.
    pub fn minus_bonds(&self, bonds: &[Bond]) -> Result<Self, SpeciesError> {
        let present: HashSet<BondId> = self.bonds.iter().map(Bond::id).collect();
        let mut doomed = HashSet::with_capacity(bonds.len());
        for bond in bonds {
            if !present.contains(&bond.id()) {
                return Err(SpeciesError::BondNotFound(bond.id()));
            }
            doomed.insert(bond.id());
        }

        let remaining_bonds: Vec<Bond> = self
            .bonds
            .iter()
            .filter(|bond| !doomed.contains(&bond.id()))
            .cloned()
            .collect();

        debug!(removed_bonds = doomed.len(), "Removing bonds from supermolecule");
        Self::assemble(&self.atoms, remaining_bonds)
    }

    /// Removes whole islands. The remaining islands are kept as they are.
    ///
    /// # Errors
    ///
    /// [`SpeciesError::IslandNotFound`] if any island is not part of this
    /// system.
    pub fn minus_islands(&self, islands: &[Island]) -> Result<Self, SpeciesError> {
        if let Some(missing) = islands.iter().find(|island| !self.contains_island(island)) {
            return Err(SpeciesError::IslandNotFound(missing.id()));
        }
        debug!(removed_islands = islands.len(), "Removing islands from supermolecule");
        Self::new(self.islands.minus(islands)?.members().iter().cloned())
    }

    /// Replaces every atom with `mapper(atom)`, keeping bond topology, bond
    /// types and island partitioning.
    ///
    /// # Errors
    ///
    /// [`SpeciesError::MappingCollision`] if the mapper returns the same atom
    /// for two different inputs.
    pub fn map<F>(&self, mut mapper: F) -> Result<Self, SpeciesError>
    where
        F: FnMut(&Atom) -> Atom,
    {
        let mut mapped: HashMap<AtomId, Atom> = HashMap::with_capacity(self.atoms.len());
        let mut origin: HashMap<AtomId, AtomId> = HashMap::with_capacity(self.atoms.len());

        for atom in &self.atoms {
            let image = mapper(atom);
            if let Some(&first) = origin.get(&image.id()) {
                return Err(SpeciesError::MappingCollision {
                    first,
                    second: atom.id(),
                });
            }
            origin.insert(image.id(), atom.id());
            mapped.insert(atom.id(), image);
        }

        let image_of = |atom: &Atom| -> Result<Atom, SpeciesError> {
            mapped
                .get(&atom.id())
                .cloned()
                .ok_or(SpeciesError::AtomNotFound(atom.id()))
        };

        let mut islands = Vec::with_capacity(self.islands.len());
        for island in self.islands.iter() {
            let rebuilt = match island {
                Island::Atom(lone) => Island::Atom(image_of(lone.atom())?.island()),
                Island::Molecule(molecule) => {
                    let bonds = molecule
                        .bonds()
                        .iter()
                        .map(|bond| {
                            Bond::new(
                                image_of(bond.atom1())?,
                                image_of(bond.atom2())?,
                                bond.bond_type().clone(),
                            )
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    Island::Molecule(Molecule::from_connected_bonds(bonds))
                }
            };
            islands.push(rebuilt);
        }

        Self::new(islands)
    }
}

impl Species for Supermolecule {
    fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    fn contains_atom(&self, atom: &Atom) -> bool {
        self.island_by_atom.contains_key(&atom.id())
    }

    /// Sum of the island charges; unknown if any island's charge is unknown.
    fn charge(&self) -> Option<i32> {
        self.islands.iter().map(|island| island.charge()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::bond::BondType;
    use crate::core::models::element::Element;
    use nalgebra::{Point3, Vector3};

    fn atom(element: Element) -> Atom {
        Atom::new(element, Point3::origin())
    }

    fn bond(a: &Atom, b: &Atom) -> Bond {
        Bond::new(a.clone(), b.clone(), BondType::Single).unwrap()
    }

    fn island_ids(system: &Supermolecule) -> HashSet<u64> {
        system.subspecies().iter().map(|i| i.id().raw()).collect()
    }

    fn bond_keys(system: &Supermolecule) -> HashSet<(AtomId, AtomId)> {
        system.bonds().iter().map(Bond::atom_pair_key).collect()
    }

    struct Fixture {
        a: Atom,
        b: Atom,
        d: Atom,
        ab: Bond,
        system: Supermolecule,
    }

    /// One A-B molecule plus a lone atom D.
    fn molecule_and_ion() -> Fixture {
        let a = atom(Element::C);
        let b = atom(Element::O);
        let d = atom(Element::Na);
        let ab = bond(&a, &b);
        let system = Supermolecule::new([
            Island::from(Molecule::new(vec![ab.clone()]).unwrap()),
            Island::from(d.island()),
        ])
        .unwrap();
        Fixture { a, b, d, ab, system }
    }

    #[test]
    fn construction_indexes_atoms_and_bonds() {
        let f = molecule_and_ion();

        assert_eq!(f.system.island_count(), 2);
        assert_eq!(f.system.atom_count(), 3);
        assert_eq!(f.system.bond_count(), 1);
        assert_eq!(f.system.molecules().count(), 1);
        assert_eq!(f.system.atom_islands().count(), 1);
        assert!(f.system.contains_atom(&f.d));
        assert!(f.system.island_of(&f.a).unwrap().is_molecule());
        assert!(!f.system.island_of(&f.d).unwrap().is_molecule());
        assert!(f.system.island_of(&atom(Element::H)).is_none());
    }

    #[test]
    fn shared_atom_across_islands_is_rejected() {
        let a = atom(Element::C);
        let b = atom(Element::C);
        let result = Supermolecule::new([
            Island::from(a.island()),
            Island::from(Molecule::new(vec![bond(&a, &b)]).unwrap()),
        ]);
        assert_eq!(result.unwrap_err(), SpeciesError::SharedAtom(a.id()));
    }

    #[test]
    fn repeated_island_is_rejected() {
        let a = atom(Element::C);
        let result = Supermolecule::new([Island::from(a.island()), Island::from(a.island())]);
        assert!(matches!(result, Err(SpeciesError::DuplicateMember(_))));
    }

    #[test]
    fn from_parts_recovers_islands_in_atom_order() {
        let atoms: Vec<Atom> = (0..5).map(|_| atom(Element::C)).collect();
        let bonds = vec![bond(&atoms[3], &atoms[4]), bond(&atoms[1], &atoms[2])];

        let system = Supermolecule::from_parts(atoms.clone(), bonds).unwrap();

        let shapes: Vec<(bool, usize)> = system
            .subspecies()
            .iter()
            .map(|i| (i.is_molecule(), i.atom_count()))
            .collect();
        assert_eq!(shapes, vec![(false, 1), (true, 2), (true, 2)]);
        assert_eq!(system.subspecies()[0].atoms(), &[atoms[0].clone()]);
        assert!(system.subspecies()[1].contains_atom(&atoms[1]));
    }

    #[test]
    fn from_parts_rejects_bonds_to_unknown_atoms() {
        let a = atom(Element::C);
        let outsider = atom(Element::C);
        let result = Supermolecule::from_parts(vec![a.clone()], vec![bond(&a, &outsider)]);
        assert_eq!(result.unwrap_err(), SpeciesError::AtomNotFound(outsider.id()));
    }

    #[test]
    fn from_parts_rejects_repeated_atoms() {
        let a = atom(Element::C);
        let result = Supermolecule::from_parts(vec![a.clone(), a.clone()], Vec::new());
        assert_eq!(result.unwrap_err(), SpeciesError::DuplicateAtom(a.id()));
    }

    #[test]
    fn minus_lone_atom_leaves_the_molecule() {
        let f = molecule_and_ion();

        let edited = f.system.minus_atoms(&[f.d.clone()]).unwrap();

        assert_eq!(edited.island_count(), 1);
        let molecule = edited.molecules().next().unwrap();
        assert_eq!(molecule.bonds(), &[f.ab.clone()]);
        assert_eq!(f.system.island_count(), 2, "receiver must stay unchanged");
    }

    #[test]
    fn minus_atoms_orphans_bond_partners() {
        let (a, b, c) = (atom(Element::C), atom(Element::C), atom(Element::C));
        let system =
            Supermolecule::from_parts(vec![a.clone(), b.clone(), c.clone()], vec![
                bond(&a, &b),
                bond(&b, &c),
            ])
            .unwrap();

        let edited = system.minus_atoms(&[b.clone()]).unwrap();

        assert_eq!(edited.island_count(), 2);
        assert_eq!(edited.molecules().count(), 0);
        assert!(edited.island_of(&a).is_some());
        assert!(edited.island_of(&c).is_some());
        assert!(!edited.contains_atom(&b));
    }

    #[test]
    fn minus_atoms_splits_a_molecule() {
        let atoms: Vec<Atom> = (0..5).map(|_| atom(Element::C)).collect();
        let bonds: Vec<Bond> = (0..4).map(|i| bond(&atoms[i], &atoms[i + 1])).collect();
        let system = Supermolecule::from_parts(atoms.clone(), bonds).unwrap();

        let edited = system.minus_atoms(&[atoms[2].clone()]).unwrap();

        assert_eq!(edited.molecules().count(), 2);
        assert_eq!(edited.bond_count(), 2);
        assert_eq!(edited.atom_count(), 4);
    }

    #[test]
    fn minus_atoms_fails_for_foreign_atom() {
        let f = molecule_and_ion();
        let stranger = atom(Element::C);
        assert_eq!(
            f.system.minus_atoms(&[stranger.clone()]).unwrap_err(),
            SpeciesError::AtomNotFound(stranger.id())
        );
    }

    #[test]
    fn minus_only_bond_yields_two_atom_islands() {
        let f = molecule_and_ion();
        let without_ion = f.system.minus_atoms(&[f.d.clone()]).unwrap();

        let edited = without_ion.minus_bonds(&[f.ab.clone()]).unwrap();

        assert_eq!(edited.island_count(), 2);
        assert_eq!(edited.molecules().count(), 0);
        assert_eq!(edited.atom_islands().count(), 2);
        assert!(edited.contains_atom(&f.a));
        assert!(edited.contains_atom(&f.b));
    }

    #[test]
    fn minus_bonds_requires_the_same_bond_object() {
        let f = molecule_and_ion();
        let lookalike = bond(&f.a, &f.b);
        assert_eq!(lookalike, f.ab);

        assert_eq!(
            f.system.minus_bonds(&[lookalike.clone()]).unwrap_err(),
            SpeciesError::BondNotFound(lookalike.id())
        );
    }

    #[test]
    fn minus_ring_bond_keeps_one_molecule() {
        let atoms: Vec<Atom> = (0..4).map(|_| atom(Element::C)).collect();
        let bonds: Vec<Bond> = (0..4).map(|i| bond(&atoms[i], &atoms[(i + 1) % 4])).collect();
        let system = Supermolecule::from_parts(atoms, bonds.clone()).unwrap();

        let opened = system.minus_bonds(&[bonds[0].clone()]).unwrap();

        assert_eq!(opened.island_count(), 1);
        assert_eq!(opened.bond_count(), 3);
    }

    #[test]
    fn minus_island_plus_island_restores_original() {
        let f = molecule_and_ion();
        for island in f.system.subspecies() {
            let rest = f.system.minus_islands(std::slice::from_ref(island)).unwrap();

            let mut restored: HashSet<u64> = rest.subspecies().iter().map(|i| i.id().raw()).collect();
            restored.insert(island.id().raw());
            assert_eq!(restored, island_ids(&f.system));
            assert!(!rest.contains_island(island));
        }
    }

    #[test]
    fn minus_islands_fails_for_foreign_island() {
        let f = molecule_and_ion();
        let stranger = Island::from(atom(Element::K).island());
        assert_eq!(
            f.system.minus_islands(&[stranger.clone()]).unwrap_err(),
            SpeciesError::IslandNotFound(stranger.id())
        );
    }

    #[test]
    fn map_identity_preserves_structure_with_new_atoms() {
        let f = molecule_and_ion();

        let mapped = f.system.map(|atom| atom.with_position(*atom.position())).unwrap();

        assert_eq!(mapped.island_count(), f.system.island_count());
        assert_eq!(mapped.bond_count(), f.system.bond_count());
        assert!(!mapped.contains_atom(&f.a));
        let shapes = |s: &Supermolecule| -> Vec<(bool, usize, usize)> {
            s.subspecies()
                .iter()
                .map(|i| (i.is_molecule(), i.atom_count(), i.bond_count()))
                .collect()
        };
        assert_eq!(shapes(&mapped), shapes(&f.system));
        assert_eq!(
            mapped.bonds()[0].bond_type(),
            f.system.bonds()[0].bond_type()
        );
    }

    #[test]
    fn map_translates_every_atom() {
        let f = molecule_and_ion();
        let shift = Vector3::new(1.0, 2.0, 3.0);

        let moved = f.system.map(|atom| atom.with_position(atom.position() + shift)).unwrap();

        for atom in moved.atoms() {
            assert_eq!(atom.position(), &Point3::new(1.0, 2.0, 3.0));
        }
        assert_eq!(moved.atoms()[2].element(), Element::Na);
    }

    #[test]
    fn map_returning_the_same_atoms_keeps_bond_topology() {
        let f = molecule_and_ion();
        let same = f.system.map(|atom| atom.clone()).unwrap();
        assert_eq!(bond_keys(&same), bond_keys(&f.system));
        assert!(same.contains_atom(&f.a));
    }

    #[test]
    fn map_collision_is_rejected() {
        let f = molecule_and_ion();
        let sink = atom(Element::C);

        let result = f.system.map(|_| sink.clone());

        assert_eq!(
            result.unwrap_err(),
            SpeciesError::MappingCollision {
                first: f.a.id(),
                second: f.b.id(),
            }
        );
    }

    #[test]
    fn charge_sums_islands_and_propagates_unknown() {
        let a = Atom::builder(Element::O, Point3::origin()).charge(-0.8).build();
        let b = Atom::builder(Element::H, Point3::origin()).charge(-0.2).build();
        let ion = Atom::builder(Element::Na, Point3::origin()).charge(1.0).build();
        let system = Supermolecule::from_parts(vec![a.clone(), b.clone(), ion.clone()], vec![
            bond(&a, &b),
        ])
        .unwrap();
        assert_eq!(system.charge(), Some(0));

        let unknown = system.minus_atoms(&[ion]).unwrap();
        assert_eq!(unknown.charge(), Some(-1));

        let with_unknown = Supermolecule::from_parts(vec![a.clone(), b.clone(), atom(Element::Cl)], vec![
            bond(&a, &b),
        ])
        .unwrap();
        assert_eq!(with_unknown.charge(), None);
    }
}
