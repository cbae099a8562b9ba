//! One-shot loading of every configured tree into a [`Registry`]

use std::time::Instant;
use tracing::{info, warn};

use super::buffer::IndexBuffer;
use super::registry::Registry;
use super::repo::{IndexState, RepoIndex};
use crate::config::{Config, TreeConfig};
use crate::metrics::{INDEXED_SYMBOLS, LOAD_LATENCY, TREES_DEGRADED, TREES_LOADED};

/// Load every tree in `config` into `registry`.
///
/// A tree whose index file is missing, empty, or unreadable is installed in
/// the degraded state; the remaining trees still load. Must not run while
/// lookups against `registry` are in flight, which `&mut` enforces.
pub fn load(config: &Config, registry: &mut Registry) {
    let timer = Instant::now();

    for (name, tree) in &config.trees {
        let index = load_tree(config, name, tree);
        registry.insert(name.clone(), index);
    }

    LOAD_LATENCY.observe(timer.elapsed().as_secs_f64());
    TREES_LOADED.set(registry.count_in_state(IndexState::Loaded) as f64);
    TREES_DEGRADED.set(registry.count_in_state(IndexState::Degraded) as f64);
    INDEXED_SYMBOLS.set(registry.total_symbols() as f64);

    info!(
        "Loaded {} trees ({} degraded, {} symbols) in {:?}",
        registry.len(),
        registry.count_in_state(IndexState::Degraded),
        registry.total_symbols(),
        timer.elapsed()
    );
}

/// Load a single tree's index, degrading on any file error
pub fn load_tree(config: &Config, name: &str, tree: &TreeConfig) -> RepoIndex {
    let path = config.index_file(tree);
    info!("Loading {} from {:?}", name, path);

    match IndexBuffer::open(&path, config.index.use_mmap) {
        Ok(buffer) => {
            let index = RepoIndex::from_buffer(buffer);
            info!(
                "Loaded {}: {} symbols, {} bytes ({})",
                name,
                index.len(),
                index.buffer_len(),
                index.backing()
            );
            index
        }
        Err(e) => {
            warn!("Tree {} degraded: {}", name, e);
            RepoIndex::degraded(e.to_string())
        }
    }
}

impl Registry {
    /// Build a fresh registry from `config`
    pub fn load(config: &Config) -> Self {
        let mut registry = Registry::new();
        load(config, &mut registry);
        registry
    }
}
