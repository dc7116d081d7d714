//! Configuration for reading, writing, and playing with knowledge files.
//!
//! Configuration is read from a TOML file; every key is optional:
//!
//! ```toml
//! # Maximum number of bytes of a label
//! max_label_len = 100
//! # Maximum nesting depth, when reading and when learning
//! max_depth = 4096
//! # Label of the root of a new knowledge base
//! placeholder_label = "unknown"
//! # Write leaves as ("label") instead of ("label" nil nil)
//! compact_leaves = true
//! ```

use crate::model::tree::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_LABEL_LEN, DEFAULT_PLACEHOLDER_LABEL};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Settings shared by the reader, the writer, and the sessions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Maximum number of bytes of a label, when reading and when learning
    pub max_label_len: usize,
    /// Maximum nesting depth, when reading and when learning
    pub max_depth: usize,
    /// Label of the single root of a knowledge base without backing file
    pub placeholder_label: String,
    /// Whether leaves are saved as `("label")` rather than `("label" nil nil)`
    pub compact_leaves: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_label_len: DEFAULT_MAX_LABEL_LEN,
            max_depth: DEFAULT_MAX_DEPTH,
            placeholder_label: DEFAULT_PLACEHOLDER_LABEL.to_string(),
            compact_leaves: true,
        }
    }
}

impl Config {
    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates the configuration file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks that the values can be used together.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_label_len == 0 {
            return Err(ConfigError::Invalid("max_label_len must be positive".into()));
        }
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be positive".into()));
        }
        if self.placeholder_label.contains('"') {
            return Err(ConfigError::Invalid(
                "placeholder_label must not contain '\"'".into(),
            ));
        }
        if self.placeholder_label.len() > self.max_label_len {
            return Err(ConfigError::Invalid(format!(
                "placeholder_label is longer than max_label_len ({})",
                self.max_label_len
            )));
        }
        Ok(())
    }
}
