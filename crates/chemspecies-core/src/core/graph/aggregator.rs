use crate::core::models::bond::Bond;
use crate::core::models::error::SpeciesError;
use crate::core::models::ids::{AtomId, BondId};
use slotmap::{SecondaryMap, SlotMap, new_key_type};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, trace};

new_key_type! {
    struct VertexKey;
}

/// One atom of the implicit bond graph.
#[derive(Debug, Default)]
struct Vertex {
    /// Atoms sharing a bond with this one.
    partners: Vec<VertexKey>,
    /// Indices into the input slice of bonds touching this atom.
    bonds: Vec<usize>,
}

/// Adjacency built from a bond list, with vertices kept in the order their
/// atoms were first encountered.
#[derive(Debug, Default)]
struct BondGraph {
    vertices: SlotMap<VertexKey, Vertex>,
    index: HashMap<AtomId, VertexKey>,
    encounter_order: Vec<VertexKey>,
}

impl BondGraph {
    fn build(bonds: &[Bond]) -> Self {
        let mut graph = Self::default();
        for (bond_idx, bond) in bonds.iter().enumerate() {
            let first = graph.vertex_for(bond.atom1().id());
            let second = graph.vertex_for(bond.atom2().id());

            graph.vertices[first].partners.push(second);
            graph.vertices[first].bonds.push(bond_idx);
            graph.vertices[second].partners.push(first);
            graph.vertices[second].bonds.push(bond_idx);
        }
        graph
    }

    fn vertex_for(&mut self, atom: AtomId) -> VertexKey {
        if let Some(&key) = self.index.get(&atom) {
            return key;
        }
        let key = self.vertices.insert(Vertex::default());
        self.index.insert(atom, key);
        self.encounter_order.push(key);
        key
    }

    /// Breadth-first expansion from `start`, returning the sorted indices of
    /// every bond in the component.
    fn expand(
        &self,
        start: VertexKey,
        visited: &mut SecondaryMap<VertexKey, ()>,
        frontier: &mut VecDeque<VertexKey>,
    ) -> Vec<usize> {
        let mut bond_indices = Vec::new();
        visited.insert(start, ());
        frontier.push_back(start);

        while let Some(key) = frontier.pop_front() {
            let vertex = &self.vertices[key];
            bond_indices.extend_from_slice(&vertex.bonds);
            for &partner in &vertex.partners {
                if visited.insert(partner, ()).is_none() {
                    frontier.push_back(partner);
                }
            }
        }

        // Each bond was collected once from each of its two atoms.
        bond_indices.sort_unstable();
        bond_indices.dedup();
        bond_indices
    }
}

/// Partitions bonds into connected components.
pub struct BondAggregator;

impl BondAggregator {
    /// Splits `bonds` into one bond list per connected component.
    ///
    /// Every input bond appears in exactly one output list and the atoms of
    /// two different lists never overlap. An empty input yields an empty
    /// output.
    ///
    /// The output is deterministic for a given input order: components are
    /// emitted in the order their first atom is met while scanning `bonds`,
    /// and bonds inside a component keep their input order. Callers should
    /// still compare results as sets where they can.
    ///
    /// # Errors
    ///
    /// * [`SpeciesError::DuplicateBond`] if the same bond is passed twice.
    /// * [`SpeciesError::ConflictingBondPair`] if two distinct bonds join the
    ///   same pair of atoms.
    pub fn aggregate(bonds: &[Bond]) -> Result<Vec<Vec<Bond>>, SpeciesError> {
        if bonds.is_empty() {
            return Ok(Vec::new());
        }
        Self::validate(bonds)?;

        let graph = BondGraph::build(bonds);
        trace!(
            atoms = graph.vertices.len(),
            bonds = bonds.len(),
            "Built bond adjacency"
        );

        let mut visited: SecondaryMap<VertexKey, ()> = SecondaryMap::new();
        let mut frontier = VecDeque::new();
        let mut islands = Vec::new();

        for &start in &graph.encounter_order {
            if visited.contains_key(start) {
                continue;
            }
            let component = graph.expand(start, &mut visited, &mut frontier);
            islands.push(component.into_iter().map(|i| bonds[i].clone()).collect());
        }

        debug!(
            bonds = bonds.len(),
            islands = islands.len(),
            "Aggregated bonds into islands"
        );
        Ok(islands)
    }

    fn validate(bonds: &[Bond]) -> Result<(), SpeciesError> {
        let mut seen: HashSet<BondId> = HashSet::with_capacity(bonds.len());
        let mut pairs: HashMap<(AtomId, AtomId), BondId> = HashMap::with_capacity(bonds.len());

        for bond in bonds {
            if !seen.insert(bond.id()) {
                return Err(SpeciesError::DuplicateBond(bond.id()));
            }
            let key = bond.atom_pair_key();
            if let Some(&first) = pairs.get(&key) {
                return Err(SpeciesError::ConflictingBondPair {
                    first,
                    second: bond.id(),
                    atom1: key.0,
                    atom2: key.1,
                });
            }
            pairs.insert(key, bond.id());
        }
        Ok(())
    }
}
