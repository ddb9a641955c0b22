use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://calc.example/";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {message}")]
    Read { path: PathBuf, message: String },

    #[error("invalid config '{path}': {message}")]
    Parse { path: PathBuf, message: String },
}

/// Process settings for `fincalc`, read from an optional TOML file.
///
/// ```toml
/// base_url = "https://calc.example/"
/// log_level = "debug"
/// log_file = "fincalc.log"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Page that share links point at.
    pub base_url: String,
    /// Level or EnvFilter directive used when `RUST_LOG` is unset.
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            log_level: "warn".to_string(),
            log_file: None,
        }
    }
}

impl AppConfig {
    pub fn from_toml(
        text: &str,
        path: &Path,
    ) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })
    }

    /// Reads `path`, or returns the defaults when no file exists there.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text, path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }
}
