use std::path::PathBuf;
use thiserror::Error;

/// Reasons an index file could not be turned into a backing buffer.
///
/// These never reach lookup callers; the loader logs them and degrades the tree.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("index file {0:?} is empty")]
    Empty(PathBuf),

    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("unknown tree: {0}")]
    UnknownTree(String),

    #[error("malformed payload for symbol {symbol:?} in tree {tree}: {source}")]
    MalformedPayload {
        tree: String,
        symbol: String,
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, LookupError>;
