//! One-shot library folder scanning
//!
//! Enumerates the supported audio files under a folder so the UI can build
//! its local library view without waiting for change events. Shares the
//! extension set with the watcher.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

use resona_common::media;

use crate::error::{Error, Result};

/// Scan result with statistics
#[derive(Debug, Clone, Serialize)]
pub struct ScanSummary {
    /// Folder that was scanned
    pub folder: PathBuf,
    /// Audio file paths found, sorted
    pub files: Vec<PathBuf>,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Count of files by audio format (lowercase extension)
    pub by_format: BTreeMap<String, usize>,
}

/// Scan `root` recursively for supported audio files.
///
/// Symlinks are not followed. Hidden entries and well-known system clutter
/// are skipped. Unreadable entries are logged and skipped; only a missing
/// or non-directory root is an error.
pub fn scan_folder(root: &Path) -> Result<ScanSummary> {
    let metadata = std::fs::metadata(root)
        .map_err(|e| Error::Scan(format!("Cannot access {}: {}", root.display(), e)))?;
    if !metadata.is_dir() {
        return Err(Error::Scan(format!("Not a directory: {}", root.display())));
    }

    let mut files = Vec::new();
    let mut total_size: u64 = 0;
    let mut by_format: BTreeMap<String, usize> = BTreeMap::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_ignored(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !media::is_audio_path(path) {
            continue;
        }

        match entry.metadata() {
            Ok(md) => total_size += md.len(),
            Err(e) => warn!("Could not stat {}: {}", path.display(), e),
        }
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            *by_format.entry(ext.to_ascii_lowercase()).or_insert(0) += 1;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(ScanSummary {
        folder: root.to_path_buf(),
        files,
        total_size,
        by_format,
    })
}

/// Hidden entries and well-known system clutter never count as library content
fn is_ignored(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || name == "Thumbs.db" || name == "desktop.ini"
}
