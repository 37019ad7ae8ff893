//! Error types for resona-agent
//!
//! Defines module-specific error types using thiserror for clear error
//! propagation. Equalizer operations use their own rejection enum
//! ([`crate::equalizer::EqualizerError`]) because those failures are
//! steady-state UI conditions rather than faults.

use thiserror::Error;

/// Main error type for resona-agent
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file loading errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Folder watch lifecycle errors
    #[error("Folder watch error: {0}")]
    Watch(String),

    /// Library scan errors
    #[error("Library scan error: {0}")]
    Scan(String),

    /// Underlying filesystem notification errors
    #[error("Filesystem watcher error: {0}")]
    Notify(#[from] notify::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using resona-agent Error
pub type Result<T> = std::result::Result<T, Error>;
