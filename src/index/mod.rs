//! Disk-backed crossref indexes
//!
//! Each tree's `crossref` file alternates symbol lines and single-line JSON
//! payloads. Loading maps the file (or reads it, when mapping is not possible)
//! and records only the byte span of every payload; lookups slice and parse
//! the payload on demand.
//!
//! A tree whose file cannot be opened is kept in a degraded state where every
//! lookup misses.

mod buffer;
mod loader;
mod reader;
mod registry;
mod repo;
mod table;

pub use buffer::{BackingKind, IndexBuffer};
pub use loader::{load, load_tree};
pub use reader::{lookup_merging, lookup_single_symbol, Crossrefs, SYMBOL_SEPARATOR};
pub use registry::Registry;
pub use repo::{IndexState, RepoIndex};
pub use table::{build_offset_table, OffsetTable, Span};
