//! Audio file type classification
//!
//! Shared by the library watcher and the library scanner so both agree on
//! what counts as audio content. Matching is case-insensitive: music folders
//! synced from other machines routinely carry `.MP3` / `.Flac` spellings.

use std::path::Path;

/// File extensions the agent treats as audio content (lowercase, no dot).
pub const AUDIO_EXTENSIONS: [&str; 6] = ["mp3", "m4a", "wav", "flac", "aac", "ogg"];

/// Check whether an extension (without the leading dot) is a supported audio format.
pub fn is_audio_extension(ext: &str) -> bool {
    let ext = ext.to_ascii_lowercase();
    AUDIO_EXTENSIONS.contains(&ext.as_str())
}

/// Check whether a path has a supported audio extension.
///
/// Paths without an extension, or with a non-UTF-8 extension, never qualify.
pub fn is_audio_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(is_audio_extension)
        .unwrap_or(false)
}
