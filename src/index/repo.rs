//! Per-tree index: a backing buffer plus its offset table

use super::buffer::{BackingKind, IndexBuffer};
use super::table::{build_offset_table, OffsetTable, Span};

/// Lifecycle state of a tree's index. Both states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    Loaded,
    Degraded,
}

impl std::fmt::Display for IndexState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexState::Loaded => write!(f, "loaded"),
            IndexState::Degraded => write!(f, "degraded"),
        }
    }
}

/// Immutable crossref index for one tree
#[derive(Debug)]
pub struct RepoIndex {
    buffer: Option<IndexBuffer>,
    offsets: OffsetTable,
    degraded_reason: Option<String>,
}

impl RepoIndex {
    /// Parse `buffer` and take ownership of it
    pub fn from_buffer(buffer: IndexBuffer) -> Self {
        let offsets = build_offset_table(&buffer);
        Self {
            buffer: Some(buffer),
            offsets,
            degraded_reason: None,
        }
    }

    /// An index with no bytes; every lookup misses
    pub fn degraded(reason: impl Into<String>) -> Self {
        Self {
            buffer: None,
            offsets: OffsetTable::new(),
            degraded_reason: Some(reason.into()),
        }
    }

    pub fn state(&self) -> IndexState {
        if self.buffer.is_some() {
            IndexState::Loaded
        } else {
            IndexState::Degraded
        }
    }

    pub fn degraded_reason(&self) -> Option<&str> {
        self.degraded_reason.as_deref()
    }

    pub fn backing(&self) -> BackingKind {
        self.buffer
            .as_ref()
            .map_or(BackingKind::None, IndexBuffer::kind)
    }

    /// Number of indexed symbols
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.offsets.contains_key(symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.offsets.keys().map(String::as_str)
    }

    pub fn span(&self, symbol: &str) -> Option<Span> {
        self.offsets.get(symbol).copied()
    }

    pub fn buffer_len(&self) -> usize {
        self.buffer.as_deref().map_or(0, <[u8]>::len)
    }

    /// Raw payload bytes for `symbol`, without parsing
    pub fn payload(&self, symbol: &str) -> Option<&[u8]> {
        let span = self.offsets.get(symbol)?;
        let buffer = self.buffer.as_deref()?;
        buffer.get(span.range())
    }
}
