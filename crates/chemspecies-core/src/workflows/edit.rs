use super::config::EditConfig;
use super::error::WorkflowError;
use crate::core::models::atom::Atom;
use crate::core::models::fragment::Species;
use crate::core::models::island::Island;
use crate::core::models::supermolecule::Supermolecule;
use crate::core::utils::geometry;
use nalgebra::Vector3;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditReport {
    pub atoms_removed: usize,
    pub bonds_removed: usize,
    /// Islands dropped by the lone-atom and size filters.
    pub islands_removed: usize,
    /// Translation applied by recentering, if any.
    pub translation: Option<Vector3<f64>>,
}

/// Applies the edits of `config` to `system`, returning the edited copy.
///
/// # Errors
///
/// * [`WorkflowError::EmptyResult`] if no atom would survive the edit.
/// * [`WorkflowError::Species`] if a structural edit fails.
#[instrument(skip_all, name = "edit_workflow")]
pub fn run(
    system: &Supermolecule,
    config: &EditConfig,
) -> Result<(Supermolecule, EditReport), WorkflowError> {
    info!(
        atoms = system.atom_count(),
        islands = system.island_count(),
        "Starting edit workflow."
    );
    let mut report = EditReport::default();
    let mut current = system.clone();

    if !config.remove_elements.is_empty() {
        let doomed: Vec<Atom> = current
            .atoms()
            .iter()
            .filter(|atom| config.remove_elements.contains(&atom.element()))
            .cloned()
            .collect();
        debug!(atoms = doomed.len(), "Removing atoms by element");
        if doomed.len() == current.atom_count() {
            return Err(WorkflowError::EmptyResult);
        }
        if !doomed.is_empty() {
            current = current.minus_atoms(&doomed)?;
        }
    }

    let small: Vec<Island> = current
        .subspecies()
        .iter()
        .filter(|island| {
            (config.remove_lone_atoms && !island.is_molecule())
                || island.atom_count() < config.min_island_atoms
        })
        .cloned()
        .collect();
    if !small.is_empty() {
        debug!(islands = small.len(), "Removing islands by size");
        if small.len() == current.island_count() {
            return Err(WorkflowError::EmptyResult);
        }
        current = current.minus_islands(&small)?;
        report.islands_removed = small.len();
    }

    if config.recenter {
        if let Some(center) = geometry::centroid(current.atoms()) {
            let offset = -center.coords;
            current = current.map(|atom| geometry::translate(atom, &offset))?;
            report.translation = Some(offset);
        }
    }

    report.atoms_removed = system.atom_count() - current.atom_count();
    report.bonds_removed = system.bond_count() - current.bond_count();
    info!(
        atoms_removed = report.atoms_removed,
        bonds_removed = report.bonds_removed,
        islands_removed = report.islands_removed,
        "Edit workflow finished."
    );
    Ok((current, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::bond::{Bond, BondType};
    use crate::core::models::element::Element;
    use nalgebra::Point3;

    /// A water molecule, a chloride ion and a sodium ion.
    fn solvated_salt() -> Supermolecule {
        let o = Atom::new(Element::O, Point3::new(0.0, 0.0, 0.0));
        let h1 = Atom::new(Element::H, Point3::new(1.0, 0.0, 0.0));
        let h2 = Atom::new(Element::H, Point3::new(0.0, 1.0, 0.0));
        let cl = Atom::new(Element::Cl, Point3::new(5.0, 0.0, 0.0));
        let na = Atom::new(Element::Na, Point3::new(-5.0, 0.0, 0.0));
        let bonds = vec![
            Bond::new(o.clone(), h1.clone(), BondType::Single).unwrap(),
            Bond::new(o.clone(), h2.clone(), BondType::Single).unwrap(),
        ];
        Supermolecule::from_parts(vec![o, h1, h2, cl, na], bonds).unwrap()
    }

    #[test]
    fn removing_hydrogens_orphans_the_oxygen() {
        let config = EditConfig::builder().remove_element(Element::H).build().unwrap();

        let (edited, report) = run(&solvated_salt(), &config).unwrap();

        assert_eq!(edited.atom_count(), 3);
        assert_eq!(edited.island_count(), 3);
        assert_eq!(edited.molecules().count(), 0);
        assert_eq!(report.atoms_removed, 2);
        assert_eq!(report.bonds_removed, 2);
        assert_eq!(report.islands_removed, 0);
    }

    #[test]
    fn removing_lone_atoms_keeps_molecules() {
        let system = solvated_salt();
        let config = EditConfig::builder().remove_lone_atoms(true).build().unwrap();

        let (edited, report) = run(&system, &config).unwrap();

        assert_eq!(edited.island_count(), 1);
        assert_eq!(report.islands_removed, 2);
        assert_eq!(report.atoms_removed, 2);
        let water = edited.subspecies()[0].id();
        assert!(system.subspecies().iter().any(|island| island.id() == water));
    }

    #[test]
    fn recentering_moves_the_centroid_to_the_origin() {
        let config = EditConfig::builder().recenter(true).build().unwrap();

        let (edited, report) = run(&solvated_salt(), &config).unwrap();

        let center = geometry::centroid(edited.atoms()).unwrap();
        assert!(center.coords.norm() < 1e-12);
        assert_eq!(report.translation, Some(Vector3::new(-0.2, -0.2, 0.0)));
        assert_eq!(edited.bond_count(), 2);
    }

    #[test]
    fn removing_everything_is_an_error() {
        let config = EditConfig::builder().min_island_atoms(10).build().unwrap();
        assert_eq!(
            run(&solvated_salt(), &config).unwrap_err(),
            WorkflowError::EmptyResult
        );
    }
}
