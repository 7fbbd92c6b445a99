//! Configuration loading
//!
//! A small TOML-backed configuration with graceful fallback: every key is
//! optional, a missing file means defaults, and the caller downgrades a
//! malformed file to a warning plus defaults rather than refusing to start.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::parser::Limits;

/// User-tunable shell settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Interactive prompt text
    pub prompt: String,
    /// Print background-job announcements and completion status lines
    pub announce_jobs: bool,
    /// Maximum accepted input line length in bytes
    pub max_line_len: usize,
    /// Per-token length bound for arguments and redirect paths
    pub max_token_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: "$ ".to_string(),
            announce_jobs: true,
            max_line_len: 512,
            max_token_len: 256,
        }
    }
}

impl Config {
    /// The tokenizer bounds derived from this configuration.
    pub fn limits(&self) -> Limits {
        Limits {
            max_line_len: self.max_line_len,
            max_token_len: self.max_token_len,
        }
    }
}

/// Configuration file loader with search-path fallback.
pub struct ConfigLoader {
    search_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            search_paths: Self::search_paths(),
        }
    }

    /// Load from the first existing search path, or defaults when none
    /// exists. A file that exists but fails to read or parse is an error;
    /// the caller decides how loudly to fall back.
    pub fn load() -> Result<Config> {
        let loader = Self::new();
        for path in &loader.search_paths {
            if path.is_file() {
                return Self::load_from_file(path);
            }
        }
        debug!("no config file found, using defaults");
        Ok(Config::default())
    }

    /// Load a specific configuration file.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|err| Error::ConfigLoadFailed {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        let config = toml::from_str(&content).map_err(|err| Error::ConfigParseFailed {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Ok(path) = env::var("MINISH_CONFIG") {
            paths.push(PathBuf::from(path));
        }
        if let Ok(dir) = env::var("XDG_CONFIG_HOME") {
            paths.push(Path::new(&dir).join("minish").join("config.toml"));
        }
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("minish").join("config.toml"));
        }
        paths
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
