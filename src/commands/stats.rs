//! Stats command for displaying per-tree index statistics

use anyhow::Result;

use crate::index::{IndexState, Registry};
use crate::metrics::gather_metrics;
use crate::Config;

/// Run the stats command
///
/// Loads every configured tree, then prints either a per-tree table or the
/// Prometheus text exposition.
pub fn run(config: &Config, prometheus: bool) -> Result<()> {
    let registry = Registry::load(config);

    if prometheus {
        print!("{}", gather_metrics());
        return Ok(());
    }

    print!("{}", render(&registry));
    Ok(())
}

fn render(registry: &Registry) -> String {
    let mut out = String::new();
    out.push_str("Crossref Index Statistics\n");
    out.push_str("=========================\n\n");

    for name in registry.tree_names() {
        let Some(index) = registry.get(name) else {
            continue;
        };
        out.push_str(&format!("{}:\n", name));
        out.push_str(&format!("  State:   {}\n", index.state()));
        out.push_str(&format!("  Symbols: {}\n", index.len()));
        out.push_str(&format!("  Bytes:   {}\n", index.buffer_len()));
        out.push_str(&format!("  Backing: {}\n", index.backing()));
        if let Some(reason) = index.degraded_reason() {
            out.push_str(&format!("  Reason:  {}\n", reason));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "Totals: {} trees ({} degraded), {} symbols\n",
        registry.len(),
        registry.count_in_state(IndexState::Degraded),
        registry.total_symbols()
    ));
    out
}
