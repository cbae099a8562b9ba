//! Point and merged lookups against loaded indexes

use serde_json::map::Entry;
use serde_json::{Map, Value};
use std::time::Instant;
use tracing::{debug, error};

use super::registry::Registry;
use super::repo::RepoIndex;
use crate::error::{LookupError, Result};
use crate::metrics::{LOOKUPS, LOOKUP_LATENCY, LOOKUP_MISSES, MALFORMED_PAYLOADS, MERGE_REQUESTS};

/// Reference kind ("uses", "defs", ...) to its value.
///
/// List kinds hold ordered reference records; a few keys written next to
/// them (`meta`) hold objects. Values are passed through as opaque JSON.
pub type Crossrefs = Map<String, Value>;

/// Separator between symbols in a merged lookup request
pub const SYMBOL_SEPARATOR: char = ',';

impl RepoIndex {
    /// Look up one symbol.
    ///
    /// Returns `Ok(None)` when the symbol is not indexed, which is distinct
    /// from `Ok(Some(empty))` for a symbol whose payload is `{}`.
    pub fn lookup(&self, tree: &str, symbol: &str) -> Result<Option<Crossrefs>> {
        LOOKUPS.inc();
        let timer = LOOKUP_LATENCY.start_timer();

        let Some(bytes) = self.payload(symbol) else {
            LOOKUP_MISSES.inc();
            timer.stop_and_discard();
            return Ok(None);
        };

        let parsed = serde_json::from_slice(bytes).map_err(|source| {
            MALFORMED_PAYLOADS.inc();
            error!("Malformed payload for {:?} in {}: {}", symbol, tree, source);
            LookupError::MalformedPayload {
                tree: tree.to_string(),
                symbol: symbol.to_string(),
                source,
            }
        })?;

        timer.observe_duration();
        Ok(Some(parsed))
    }

    /// Look up a comma-separated batch and merge the results.
    ///
    /// All-or-nothing: if any symbol is missing the result is empty. Array
    /// values for a kind shared by several symbols are concatenated in request
    /// order. Any other value (such as `meta`) keeps the first symbol's.
    pub fn lookup_merging(&self, tree: &str, symbols: &str) -> Result<Crossrefs> {
        MERGE_REQUESTS.inc();
        let started = Instant::now();

        let mut merged = Crossrefs::new();
        for symbol in symbols.split(SYMBOL_SEPARATOR) {
            let Some(found) = self.lookup(tree, symbol)? else {
                debug!("Merged lookup in {} missed on {:?}", tree, symbol);
                return Ok(Crossrefs::new());
            };

            for (kind, value) in found {
                merge_kind(merged.entry(kind), value);
            }
        }

        debug!(
            "Merged lookup in {} for {:?} took {:?}",
            tree,
            symbols,
            started.elapsed()
        );
        Ok(merged)
    }
}

fn merge_kind(entry: Entry<'_>, value: Value) {
    match entry {
        Entry::Vacant(slot) => {
            slot.insert(value);
        }
        Entry::Occupied(mut slot) => {
            if let (Value::Array(existing), Value::Array(more)) = (slot.get_mut(), value) {
                existing.extend(more);
            }
        }
    }
}

impl Registry {
    fn tree(&self, tree: &str) -> Result<&RepoIndex> {
        self.get(tree)
            .ok_or_else(|| LookupError::UnknownTree(tree.to_string()))
    }

    /// See [`lookup_single_symbol`]
    pub fn lookup_single_symbol(&self, tree: &str, symbol: &str) -> Result<Option<Crossrefs>> {
        self.tree(tree)?.lookup(tree, symbol)
    }

    /// See [`lookup_merging`]
    pub fn lookup_merging(&self, tree: &str, symbols: &str) -> Result<Crossrefs> {
        self.tree(tree)?.lookup_merging(tree, symbols)
    }
}

/// Look up a single symbol in `tree`, `Ok(None)` if it is not indexed.
pub fn lookup_single_symbol(
    registry: &Registry,
    tree: &str,
    symbol: &str,
) -> Result<Option<Crossrefs>> {
    registry.lookup_single_symbol(tree, symbol)
}

/// Look up comma-joined `symbols` in `tree` and merge their references.
pub fn lookup_merging(registry: &Registry, tree: &str, symbols: &str) -> Result<Crossrefs> {
    registry.lookup_merging(tree, symbols)
}
