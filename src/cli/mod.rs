use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod handlers;

/// schematix: interactive command builder for schematic collections.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project root holding `tslint.json` and `node_modules`.
    /// Defaults to the current directory.
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pick a collection and schematic interactively, fill its options and
    /// run the resulting command.
    #[command(alias = "g")]
    Generate {
        /// Path the generation is targeted at, used to suggest a
        /// path-qualified name.
        path: Option<PathBuf>,
    },

    /// Generate from the default collection with a single name prompt.
    #[command(alias = "q")]
    Quick {
        /// Schematic of the default collection (component, service, ...).
        schematic: String,

        /// Path the generation is targeted at.
        path: Option<PathBuf>,
    },
}
