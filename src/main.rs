use anyhow::Result;
use clap::Parser;
use std::path::Path;

use crossref_index::cli::{Cli, Commands};
use crossref_index::config::Config;
use crossref_index::logging::{init_early_logging, init_logging};
use crossref_index::metrics;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            init_early_logging();
            tracing::error!("{:#}", e);
            return Err(e);
        }
    };

    // Relative log directories resolve against the config file's directory
    let base_dir = cli
        .config
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    // The guard MUST be held until program exit to ensure logs are flushed
    let _logging_guard = init_logging(&config.logging, base_dir)?;

    tracing::debug!("Loaded configuration from {}", cli.config.display());

    metrics::register_metrics();

    match cli.command {
        Commands::Lookup { tree, symbol } => {
            crossref_index::commands::lookup::run(&config, &tree, &symbol)?;
        }
        Commands::Merge { tree, symbols } => {
            crossref_index::commands::lookup::run_merge(&config, &tree, &symbols)?;
        }
        Commands::Stats { prometheus } => {
            crossref_index::commands::stats::run(&config, prometheus)?;
        }
    }

    Ok(())
}
