//! `lookup` and `merge` commands

use anyhow::{bail, Context, Result};

use crate::index::{Crossrefs, Registry};
use crate::Config;

/// Print the references for one symbol, failing if it is not indexed
pub fn run(config: &Config, tree: &str, symbol: &str) -> Result<()> {
    let registry = Registry::load(config);

    match registry.lookup_single_symbol(tree, symbol)? {
        Some(crossrefs) => print_json(&crossrefs),
        None => bail!("Symbol {:?} not found in tree {}", symbol, tree),
    }
}

/// Print the merged references for comma-separated symbols
pub fn run_merge(config: &Config, tree: &str, symbols: &str) -> Result<()> {
    let registry = Registry::load(config);
    let merged = registry.lookup_merging(tree, symbols)?;
    print_json(&merged)
}

fn print_json(crossrefs: &Crossrefs) -> Result<()> {
    let output =
        serde_json::to_string_pretty(crossrefs).context("Failed to serialize crossrefs")?;
    println!("{}", output);
    Ok(())
}
