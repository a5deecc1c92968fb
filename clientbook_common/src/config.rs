//! Application configuration
//!
//! Resolved in this order, later sources winning:
//! 1. built-in defaults;
//! 2. a TOML file, `clientbook.toml` in the working directory
//!    or whatever `CLIENTBOOK_CONFIG` points to;
//! 3. the `CLIENTBOOK_DB` environment variable;
//! 4. the first command-line argument.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_DATABASE: &str = "clients.sqlite";
pub const DEFAULT_CONFIG_FILE: &str = "clientbook.toml";
pub const CONFIG_ENV: &str = "CLIENTBOOK_CONFIG";
pub const DATABASE_ENV: &str = "CLIENTBOOK_DB";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Path of the SQLite database file
    pub database: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database: PathBuf::from(DEFAULT_DATABASE),
        }
    }
}

impl Config {
    /// **Loads the configuration from all sources**
    ///
    /// `database_arg` is the optional command-line override.
    pub fn load(database_arg: Option<String>) -> Result<Self, ConfigError> {
        let mut config = match env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path), true)?,
            None => Self::from_file(Path::new(DEFAULT_CONFIG_FILE), false)?,
        };

        if let Some(database) = env::var_os(DATABASE_ENV) {
            config.database = PathBuf::from(database);
        }
        if let Some(database) = database_arg {
            config.database = PathBuf::from(database);
        }

        Ok(config)
    }

    /// **Reads a TOML config file**
    ///
    /// If the file doesn't exist and isn't `required`, returns the defaults.
    pub fn from_file(path: &Path, required: bool) -> Result<Self, ConfigError> {
        if !required && !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
