use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "crossref-index")]
#[command(author, version, about = "Query memory-mapped symbol crossref indexes")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file (TOML, or JSON with a .json extension)
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look up a single symbol
    Lookup {
        /// Tree (repository) name
        tree: String,

        /// Symbol to look up
        symbol: String,
    },

    /// Look up comma-separated symbols and merge their references
    Merge {
        /// Tree (repository) name
        tree: String,

        /// Comma-separated symbols, e.g. "_ZN3foo3barEv,_ZN3foo3bazEv"
        symbols: String,
    },

    /// Load every tree and show per-tree index statistics
    Stats {
        /// Output in Prometheus format
        #[arg(long)]
        prometheus: bool,
    },
}
