use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line arguments of the `units` binary.
#[derive(Debug, Parser)]
#[command(name = "units")]
#[command(bin_name = "units")]
#[command(about = "Inspect and resolve units", long_about = None)]
pub struct UnitsCli {
    /// Directory holding one `<name>.unit` file per unit
    #[arg(short, long, env = "UNITS_DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Owner label of the loaded account
    #[arg(long, default_value = "local")]
    pub owner: String,

    /// What to do with the loaded units
    #[command(subcommand)]
    pub command: Command,
}

/// What to do with the loaded units.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the names of all units
    List,
    /// Parse a unit and print its canonical text
    Show {
        /// Name of the unit
        name: String,
    },
    /// Print the units a unit refers to directly
    Deps {
        /// Name of the unit
        name: String,
    },
    /// Resolve a unit and print the resulting value as JSON
    Resolve {
        /// Name of the unit
        name: String,
    },
}
