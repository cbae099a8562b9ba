use std::collections::HashMap;

use super::repo::{IndexState, RepoIndex};

/// Loaded indexes keyed by tree name.
///
/// Filled once by the loader and then shared read-only; no interior mutability.
#[derive(Debug, Default)]
pub struct Registry {
    trees: HashMap<String, RepoIndex>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install an index, replacing any previous one for `name`
    pub fn insert(&mut self, name: impl Into<String>, index: RepoIndex) {
        self.trees.insert(name.into(), index);
    }

    pub fn get(&self, name: &str) -> Option<&RepoIndex> {
        self.trees.get(name)
    }

    /// Tree names in sorted order
    pub fn tree_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.trees.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn count_in_state(&self, state: IndexState) -> usize {
        self.trees.values().filter(|t| t.state() == state).count()
    }

    /// Symbols across every tree
    pub fn total_symbols(&self) -> usize {
        self.trees.values().map(RepoIndex::len).sum()
    }
}
