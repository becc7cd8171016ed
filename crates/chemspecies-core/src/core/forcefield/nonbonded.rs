use super::params::VdwTable;
use super::potentials;
use crate::core::models::atom::Atom;
use crate::core::models::fragment::Species;
use crate::core::models::fragmented::FragmentedSupermolecule;
use crate::core::models::ids::AtomId;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EnergyError {
    #[error("No atom class assigned to {0}")]
    MissingClass(AtomId),
    #[error("No van der Waals parameters for atom class '{0}'")]
    MissingParameter(String),
}

/// Result of a non-bonded evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NonBondedEnergy {
    /// Total van der Waals energy in kcal/mol.
    pub vdw: f64,
    /// Number of atom pairs evaluated.
    pub pairs: usize,
}

/// Assigns every atom the class carried in its tag, or its element symbol
/// when it has no tag.
pub fn classes_from_tags<S: Species + ?Sized>(species: &S) -> HashMap<AtomId, String> {
    species
        .atoms()
        .iter()
        .map(|atom| (atom.id(), default_class(atom)))
        .collect()
}

fn default_class(atom: &Atom) -> String {
    atom.tag()
        .map(str::to_string)
        .unwrap_or_else(|| atom.element().symbol().to_string())
}

/// Sums pairwise 12-6 Lennard-Jones energies between atoms of different
/// fragments.
pub struct NonBondedEvaluator<'a> {
    table: &'a VdwTable,
}

impl<'a> NonBondedEvaluator<'a> {
    pub fn new(table: &'a VdwTable) -> Self {
        Self { table }
    }

    /// # Errors
    ///
    /// * [`EnergyError::MissingClass`] if an atom has no entry in `classes`.
    /// * [`EnergyError::MissingParameter`] if a class has no parameters in
    ///   the table.
    #[instrument(skip_all, name = "nonbonded_evaluation")]
    pub fn evaluate(
        &self,
        system: &FragmentedSupermolecule,
        classes: &HashMap<AtomId, String>,
    ) -> Result<NonBondedEnergy, EnergyError> {
        let atoms = system.supermolecule().atoms();
        let mut resolved: HashMap<AtomId, &str> = HashMap::with_capacity(atoms.len());
        for atom in atoms {
            let class = classes
                .get(&atom.id())
                .ok_or(EnergyError::MissingClass(atom.id()))?;
            if self.table.get(class).is_none() {
                return Err(EnergyError::MissingParameter(class.clone()));
            }
            resolved.insert(atom.id(), class.as_str());
        }

        let mut energy = NonBondedEnergy::default();
        for (a, b) in system.cross_atom_pairs() {
            let (class_a, class_b) = (resolved[&a.id()], resolved[&b.id()]);
            let pair = self
                .table
                .pair(class_a, class_b)
                .ok_or_else(|| EnergyError::MissingParameter(class_a.to_string()))?;
            let dist = nalgebra::distance(a.position(), b.position());
            energy.vdw += potentials::lennard_jones_12_6(dist, pair.radius, pair.well_depth);
            energy.pairs += 1;
        }

        debug!(pairs = energy.pairs, vdw = energy.vdw, "Evaluated non-bonded energy");
        Ok(energy)
    }
}
