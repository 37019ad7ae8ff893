//! Capability boundary to the external equalizer program
//!
//! The external program may be absent, mid-install, or access-denied; every
//! backend operation reports that through ordinary results. Hosts without
//! the capability get [`NullBackend`] instead of optional-chaining checks at
//! every call site.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Where an equalizer install was found and which file drives it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub install_dir: PathBuf,
    pub config_path: PathBuf,
}

/// Capability interface to the external equalizer program
pub trait EqualizerBackend: Send + Sync {
    /// Probe for an install; `None` means the program is absent
    fn detect(&self) -> Option<Detection>;

    /// Read the current config file contents
    fn read_config(&self) -> io::Result<String>;

    /// Replace the config file contents
    fn write_config(&self, text: &str) -> io::Result<()>;
}

/// Filesystem-backed Equalizer APO integration
///
/// The install directory doubles as the availability probe.
pub struct ApoBackend {
    install_dir: PathBuf,
    config_path: PathBuf,
}

impl ApoBackend {
    pub fn new(install_dir: PathBuf, config_path: PathBuf) -> Self {
        Self {
            install_dir,
            config_path,
        }
    }

    /// Build a backend from optional config overrides, falling back to the
    /// platform defaults.
    pub fn with_defaults(install_dir: Option<PathBuf>, config_path: Option<PathBuf>) -> Self {
        let install_dir = install_dir.unwrap_or_else(default_install_dir);
        let config_path = config_path.unwrap_or_else(|| default_config_path(&install_dir));
        Self::new(install_dir, config_path)
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

/// Platform default install directory of the external program.
///
/// The real program ships on Windows under Program Files; elsewhere an
/// APO-style tree under the user config dir can stand in during
/// development.
pub fn default_install_dir() -> PathBuf {
    if cfg!(target_os = "windows") {
        PathBuf::from(r"C:\Program Files\EqualizerAPO")
    } else {
        dirs::config_dir()
            .map(|d| d.join("EqualizerAPO"))
            .unwrap_or_else(|| PathBuf::from("EqualizerAPO"))
    }
}

/// The config file the external program reads, relative to its install dir
pub fn default_config_path(install_dir: &Path) -> PathBuf {
    install_dir.join("config").join("config.txt")
}

impl EqualizerBackend for ApoBackend {
    fn detect(&self) -> Option<Detection> {
        if self.install_dir.is_dir() {
            debug!("Equalizer install found at {}", self.install_dir.display());
            Some(Detection {
                install_dir: self.install_dir.clone(),
                config_path: self.config_path.clone(),
            })
        } else {
            debug!(
                "No equalizer install at {}",
                self.install_dir.display()
            );
            None
        }
    }

    fn read_config(&self) -> io::Result<String> {
        std::fs::read_to_string(&self.config_path)
    }

    fn write_config(&self, text: &str) -> io::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.config_path, text)
    }
}

/// Backend for hosts where the capability is absent entirely
pub struct NullBackend;

impl EqualizerBackend for NullBackend {
    fn detect(&self) -> Option<Detection> {
        None
    }

    fn read_config(&self) -> io::Result<String> {
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            "no equalizer backend available",
        ))
    }

    fn write_config(&self, _text: &str) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "no equalizer backend available",
        ))
    }
}
