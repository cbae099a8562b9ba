pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod index;
pub mod logging;
pub mod metrics;

pub use config::Config;
pub use error::{LoadError, LookupError};
pub use index::{
    load, lookup_merging, lookup_single_symbol, Crossrefs, IndexState, Registry, RepoIndex,
};
