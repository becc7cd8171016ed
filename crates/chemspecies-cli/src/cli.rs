use chemspecies::core::models::element::Element;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Chemspecies Developers",
    version,
    about = "Chemspecies CLI - Inspect, edit and score molecular systems as islands of bonded atoms.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize the islands, charge and composition of a structure file.
    Info(InfoArgs),
    /// Remove atoms or islands from a structure and optionally recenter it.
    Edit(EditArgs),
    /// Compute the van der Waals interaction energy between islands.
    Energy(EnergyArgs),
}

/// Arguments for the `info` subcommand.
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Path to the input structure file (.mol2 or .pdb).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,
}

/// Arguments for the `edit` subcommand.
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Path to the input structure file (.mol2 or .pdb).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the output structure file. The format follows the extension.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Path to an edit configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Remove every atom of this element (repeatable, e.g. -e H -e Na).
    #[arg(short = 'e', long = "remove-element", value_name = "SYMBOL")]
    pub remove_elements: Vec<Element>,

    /// Remove islands made of a single unbonded atom.
    #[arg(long)]
    pub remove_lone_atoms: bool,

    /// Remove islands with fewer atoms than this.
    #[arg(short = 'm', long, value_name = "INT")]
    pub min_island_atoms: Option<usize>,

    /// Translate the result so that its centroid sits at the origin.
    #[arg(long)]
    pub recenter: bool,
}

/// Arguments for the `energy` subcommand.
#[derive(Args, Debug)]
pub struct EnergyArgs {
    /// Path to the input structure file (.mol2 or .pdb).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to the van der Waals parameter table in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub params: PathBuf,

    /// Report the energy of every island against the rest of the system.
    #[arg(long)]
    pub per_island: bool,
}
