use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const DEFAULT_INDEX_FILE: &str = "crossref";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Trees to load, keyed by repository name
    #[serde(default)]
    pub trees: BTreeMap<String, TreeConfig>,

    #[serde(default)]
    pub index: IndexConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Per-tree settings. Unknown keys (files_path, objdir_path, ...) are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Directory holding the tree's crossref file
    pub index_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Memory-map index files; when false, files are read into owned buffers
    #[serde(default = "default_use_mmap")]
    pub use_mmap: bool,

    /// Name of the index file beneath each tree's index_path
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            use_mmap: default_use_mmap(),
            file_name: default_file_name(),
        }
    }
}

fn default_use_mmap() -> bool {
    true
}

fn default_file_name() -> String {
    DEFAULT_INDEX_FILE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write logs to a rolling file
    #[serde(default)]
    pub enabled: bool,

    /// Write logs to stderr
    #[serde(default = "default_stderr")]
    pub stderr: bool,

    /// File log level: trace, debug, info, warn, error
    #[serde(default = "default_level")]
    pub level: String,

    /// Log directory, relative paths resolve against the config file's directory
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,

    /// Rotation: hourly, daily, minutely, never
    #[serde(default = "default_rotation")]
    pub rotation: String,

    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            stderr: default_stderr(),
            level: default_level(),
            directory: default_log_directory(),
            rotation: default_rotation(),
            file_prefix: default_file_prefix(),
        }
    }
}

fn default_stderr() -> bool {
    true
}

fn default_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> PathBuf {
    PathBuf::from("logs")
}

fn default_rotation() -> String {
    "daily".to_string()
}

fn default_file_prefix() -> String {
    "crossref-index.log".to_string()
}

impl Config {
    /// Load configuration from a TOML file, or JSON when the extension is `.json`
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config from {:?}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config from {:?}", path))
        }
    }

    /// Build a configuration from `(tree name, index_path)` pairs
    pub fn from_trees<I, N, P>(trees: I) -> Self
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<String>,
        P: Into<PathBuf>,
    {
        let trees = trees
            .into_iter()
            .map(|(name, path)| {
                (
                    name.into(),
                    TreeConfig {
                        index_path: path.into(),
                    },
                )
            })
            .collect();

        Self {
            trees,
            ..Self::default()
        }
    }

    /// Path of the crossref file for a tree
    pub fn index_file(&self, tree: &TreeConfig) -> PathBuf {
        tree.index_path.join(&self.index.file_name)
    }
}
