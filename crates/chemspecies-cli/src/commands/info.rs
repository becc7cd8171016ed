use crate::cli::InfoArgs;
use crate::error::Result;
use crate::io;
use chemspecies::core::models::element::Element;
use chemspecies::core::models::fragment::Species;
use chemspecies::core::models::supermolecule::Supermolecule;
use std::collections::BTreeMap;
use tracing::info;

/// Summary of a structure, as printed by `chemspecies info`.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub atoms: usize,
    pub bonds: usize,
    pub molecules: usize,
    pub atom_islands: usize,
    pub charge: Option<i32>,
    /// Atom counts per element, ordered by atomic number.
    pub composition: BTreeMap<Element, usize>,
    /// Atom count of the largest island.
    pub largest_island: usize,
}

impl Summary {
    pub fn of(system: &Supermolecule) -> Self {
        let mut composition = BTreeMap::new();
        for atom in system.atoms() {
            *composition.entry(atom.element()).or_insert(0) += 1;
        }
        Self {
            atoms: system.atom_count(),
            bonds: system.bond_count(),
            molecules: system.molecules().count(),
            atom_islands: system.atom_islands().count(),
            charge: system.charge(),
            composition,
            largest_island: system
                .subspecies()
                .iter()
                .map(|island| island.atom_count())
                .max()
                .unwrap_or(0),
        }
    }

    /// Element symbols in atomic-number order, each followed by its count when above one.
    pub fn formula(&self) -> String {
        self.composition
            .iter()
            .map(|(element, &count)| match count {
                1 => element.symbol().to_string(),
                n => format!("{}{}", element.symbol(), n),
            })
            .collect()
    }
}

pub fn run(args: InfoArgs) -> Result<()> {
    let (system, _) = io::read_structure(&args.input)?;
    let summary = Summary::of(&system);
    info!(
        atoms = summary.atoms,
        islands = summary.molecules + summary.atom_islands,
        "Summarized structure"
    );

    println!("Structure: {}", args.input.display());
    println!("  Atoms:          {}", summary.atoms);
    println!("  Bonds:          {}", summary.bonds);
    println!(
        "  Islands:        {} ({} molecules, {} lone atoms)",
        summary.molecules + summary.atom_islands,
        summary.molecules,
        summary.atom_islands
    );
    println!("  Largest island: {} atoms", summary.largest_island);
    println!("  Composition:    {}", summary.formula());
    match summary.charge {
        Some(charge) => println!("  Total charge:   {:+}", charge),
        None => println!("  Total charge:   unknown"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chemspecies::core::models::atom::Atom;
    use nalgebra::Point3;

    #[test]
    fn summary_counts_islands_and_composition() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("system.mol2");
        std::fs::write(&path, io::WATER_AND_ION_MOL2).unwrap();
        let (system, _) = io::read_structure(&path).unwrap();

        let summary = Summary::of(&system);

        assert_eq!(summary.atoms, 4);
        assert_eq!(summary.bonds, 2);
        assert_eq!(summary.molecules, 1);
        assert_eq!(summary.atom_islands, 1);
        assert_eq!(summary.largest_island, 3);
        assert_eq!(summary.charge, Some(1));
        assert_eq!(summary.formula(), "H2ONa");
    }

    #[test]
    fn unknown_charge_is_reported_as_none() {
        let system = Supermolecule::from_parts(
            vec![Atom::new(Element::Ar, Point3::origin())],
            Vec::new(),
        )
        .unwrap();

        let summary = Summary::of(&system);

        assert_eq!(summary.charge, None);
        assert_eq!(summary.formula(), "Ar");
    }

    #[test]
    fn run_reads_the_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("system.mol2");
        std::fs::write(&path, io::WATER_AND_ION_MOL2).unwrap();

        assert!(run(InfoArgs { input: path }).is_ok());
    }
}
