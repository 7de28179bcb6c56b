//! Configuration loading for pagesearch.

use std::path::{Path, PathBuf};

use directories::{BaseDirs, ProjectDirs};
use serde::Deserialize;

use crate::search::highlight::DEFAULT_HIGHLIGHT_CLASS;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV_VAR: &str = "PAGESEARCH_CONFIG";

/// Number of top-ranked pages re-scanned block by block.
pub const DEFAULT_CANDIDATE_LIMIT: usize = 10;

/// Number of block entries returned from a query.
pub const DEFAULT_RESULT_LIMIT: usize = 15;

/// Top-level configuration loaded from config.toml.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Location of the page corpus.
#[derive(Debug, Deserialize)]
pub struct CorpusConfig {
    /// Directory holding one JSON file per page.
    #[serde(default = "default_corpus_path")]
    pub path: String,
}

/// Result limits and highlight styling for queries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub candidate_limit: usize,
    pub result_limit: usize,
    /// CSS class of the span wrapped around matched terms.
    pub highlight_class: String,
}

fn default_corpus_path() -> String {
    "./pages".to_string()
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            path: default_corpus_path(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
            result_limit: DEFAULT_RESULT_LIMIT,
            highlight_class: DEFAULT_HIGHLIGHT_CLASS.to_string(),
        }
    }
}

impl Config {
    /// Load config from `$PAGESEARCH_CONFIG` or ~/.config/pagesearch/config.toml,
    /// or return defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> anyhow::Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Config::default()),
        }
    }

    /// Load config from an explicit file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read config {}: {e}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display()))?;
        Ok(config)
    }

    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }

        ProjectDirs::from("", "", "pagesearch").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// The corpus directory with `~` expanded.
    #[must_use]
    pub fn corpus_root(&self) -> PathBuf {
        expand_tilde(&self.corpus.path)
    }
}

/// Expand ~ to the user's home directory.
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(base_dirs) = BaseDirs::new()
    {
        return base_dirs.home_dir().join(rest);
    }
    PathBuf::from(path)
}
