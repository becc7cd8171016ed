use crate::cli::EnergyArgs;
use crate::error::Result;
use crate::io;
use chemspecies::core::forcefield::nonbonded::{
    NonBondedEnergy, NonBondedEvaluator, classes_from_tags,
};
use chemspecies::core::forcefield::params::VdwTable;
use chemspecies::core::models::fragment::{Fragment, Species};
use chemspecies::core::models::fragmented::FragmentedSupermolecule;
use chemspecies::core::models::supermolecule::Supermolecule;
use tracing::{info, warn};

/// Interaction energy of each island with the rest of the system, in island order.
pub fn per_island_energies(
    system: &Supermolecule,
    table: &VdwTable,
) -> Result<Vec<NonBondedEnergy>> {
    let classes = classes_from_tags(system);
    let evaluator = NonBondedEvaluator::new(table);
    let mut energies = Vec::with_capacity(system.island_count());

    for island in system.subspecies() {
        let rest: Vec<_> = system
            .atoms()
            .iter()
            .filter(|atom| !island.contains_atom(atom))
            .cloned()
            .collect();
        if rest.is_empty() {
            energies.push(NonBondedEnergy::default());
            continue;
        }
        let fragments = vec![
            Fragment::new(island.atoms().iter().cloned())?,
            Fragment::new(rest)?,
        ];
        let fragmented = FragmentedSupermolecule::new(system.clone(), fragments)?;
        energies.push(evaluator.evaluate(&fragmented, &classes)?);
    }
    Ok(energies)
}

pub fn run(args: EnergyArgs) -> Result<()> {
    info!("Loading van der Waals parameters from {:?}", &args.params);
    let table = VdwTable::load(&args.params)?;
    let (system, _) = io::read_structure(&args.input)?;

    if system.island_count() < 2 {
        warn!("The structure has a single island; there are no inter-island pairs.");
    }

    let classes = classes_from_tags(&system);
    let fragmented = FragmentedSupermolecule::by_islands(system)?;
    let total = NonBondedEvaluator::new(&table).evaluate(&fragmented, &classes)?;

    println!(
        "Inter-island van der Waals energy: {:.4} kcal/mol ({} pairs, {} rule)",
        total.vdw,
        total.pairs,
        table.combination_rule()
    );

    if args.per_island {
        let system = fragmented.supermolecule();
        let energies = per_island_energies(system, &table)?;
        for (n, (island, energy)) in system.subspecies().iter().zip(&energies).enumerate() {
            println!(
                "  Island {:>4} ({:>5} atoms): {:>12.4} kcal/mol",
                n + 1,
                island.atom_count(),
                energy.vdw
            );
        }
    }
    Ok(())
}
