use crate::cli::EditArgs;
use crate::config::PartialEditConfig;
use crate::error::Result;
use crate::io;
use chemspecies::core::models::fragment::Species;
use chemspecies::workflows;
use tracing::info;

pub fn run(args: EditArgs) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialEditConfig::from_file(path)?,
        None => PartialEditConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args)?;

    let (system, metadata) = io::read_structure(&args.input)?;

    info!("Invoking the core edit workflow...");
    let (edited, report) = workflows::edit::run(&system, &config)?;

    io::write_structure(&edited, &metadata, &args.output)?;

    println!(
        "Removed {} atom(s), {} bond(s) and {} island(s).",
        report.atoms_removed, report.bonds_removed, report.islands_removed
    );
    if let Some(offset) = report.translation {
        println!(
            "Recentered by ({:.4}, {:.4}, {:.4}) Å.",
            offset.x, offset.y, offset.z
        );
    }
    println!(
        "✓ Edited structure ({} atoms, {} islands) written to: {}",
        edited.atom_count(),
        edited.island_count(),
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use chemspecies::core::models::element::Element;
    use chemspecies::workflows::{ConfigError, WorkflowError};
    use std::path::{Path, PathBuf};

    fn args(dir: &Path, output: &str) -> EditArgs {
        let input = dir.join("system.mol2");
        std::fs::write(&input, io::WATER_AND_ION_MOL2).unwrap();
        EditArgs {
            input,
            output: dir.join(output),
            config: None,
            remove_elements: Vec::new(),
            remove_lone_atoms: false,
            min_island_atoms: None,
            recenter: false,
        }
    }

    #[test]
    fn removes_lone_atoms_and_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(dir.path(), "water.mol2");
        args.remove_lone_atoms = true;
        let output = args.output.clone();

        run(args).unwrap();

        let (edited, _) = io::read_structure(&output).unwrap();
        assert_eq!(edited.atom_count(), 3);
        assert_eq!(edited.island_count(), 1);
        assert_eq!(edited.molecules().count(), 1);
    }

    #[test]
    fn config_file_drives_the_edit() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("edit.toml");
        std::fs::write(&config_path, "[remove]\nelements = [\"H\"]\n").unwrap();
        let mut args = args(dir.path(), "heavy.pdb");
        args.config = Some(config_path);
        let output: PathBuf = args.output.clone();

        run(args).unwrap();

        let (edited, _) = io::read_structure(&output).unwrap();
        assert_eq!(edited.atom_count(), 2);
        assert_eq!(edited.bond_count(), 0);
        assert!(edited.atoms().iter().all(|atom| atom.element() != Element::H));
    }

    #[test]
    fn edit_without_operations_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(dir.path(), "out.mol2");
        let output = args.output.clone();

        let result = run(args);

        assert!(matches!(result, Err(CliError::Config(ConfigError::NoOperation))));
        assert!(!output.exists());
    }

    #[test]
    fn removing_everything_fails_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(dir.path(), "out.mol2");
        args.min_island_atoms = Some(4);
        let output = args.output.clone();

        let result = run(args);

        assert!(matches!(
            result,
            Err(CliError::Workflow(WorkflowError::EmptyResult))
        ));
        assert!(!output.exists());
    }
}
