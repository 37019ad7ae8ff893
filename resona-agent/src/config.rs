//! Configuration for the Resona agent
//!
//! A minimal TOML bootstrap file: port, music folder, equalizer install
//! paths, and logging. Everything else the agent persists lives in the
//! external equalizer program's config file, so there is no database tier.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Bootstrap configuration loaded from the TOML file
///
/// These settings cannot change during runtime; the agent must restart to
/// pick up edits.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Music folder to watch (optional)
    ///
    /// If not specified, resolution falls through CLI argument →
    /// environment → OS default.
    #[serde(default)]
    pub music_folder: Option<PathBuf>,

    /// Equalizer integration paths (optional)
    #[serde(default)]
    pub equalizer: EqualizerSection,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Overrides for locating the external equalizer program
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EqualizerSection {
    /// Install directory of the external program
    #[serde(default)]
    pub install_dir: Option<PathBuf>,

    /// Config file the agent writes; defaults to `config/config.txt`
    /// under the install directory
    #[serde(default)]
    pub config_path: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            music_folder: None,
            equalizer: EqualizerSection::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_port() -> u16 {
    5747
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Load configuration from an explicit path or the platform location.
    ///
    /// A missing file is not an error when no explicit path was given:
    /// built-in defaults apply. An explicit path that cannot be read or
    /// parsed is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match resona_common::config::config_file_path() {
                Ok(path) => path,
                Err(_) => {
                    info!("No config file found, using built-in defaults");
                    return Ok(Self::default());
                }
            },
        };

        let text = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config: TomlConfig = toml::from_str(&text)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}
