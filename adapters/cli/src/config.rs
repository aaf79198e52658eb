//! Session configuration loading.

use std::{
    fs,
    path::{Path, PathBuf},
};

use maze_chase_core::SessionConfig;
use thiserror::Error;

/// Errors that can occur while loading a configuration file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {path}")]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid session TOML.
    #[error("config file {path} is invalid")]
    Parse {
        /// File that was requested.
        path: PathBuf,
        /// Underlying TOML failure.
        #[source]
        source: toml::de::Error,
    },
}

/// Reads a session configuration from `path`.
pub(crate) fn load(path: &Path) -> Result<SessionConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_owned(),
        source,
    })?;
    parse(&text).map_err(|source| ConfigError::Parse {
        path: path.to_owned(),
        source,
    })
}

fn parse(text: &str) -> Result<SessionConfig, toml::de::Error> {
    toml::from_str(text)
}
