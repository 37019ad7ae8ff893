//! Configuration loading and music folder resolution

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Music folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_music_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    toml_value: Option<&PathBuf>,
) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = toml_value {
        return path.clone();
    }

    // Priority 4: OS-dependent compiled default
    default_music_folder()
}

/// Locate the agent configuration file for the platform.
///
/// Linux additionally consults `/etc/resona/config.toml` so a system-wide
/// install can ship defaults without touching the user's home.
pub fn config_file_path() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        let user_config = dirs::config_dir().map(|d| d.join("resona").join("config.toml"));
        let system_config = PathBuf::from("/etc/resona/config.toml");

        if let Some(path) = user_config {
            if path.exists() {
                return Ok(path);
            }
        }
        if system_config.exists() {
            return Ok(system_config);
        }
        return Err(Error::Config("No config file found".to_string()));
    }

    let path = dirs::config_dir()
        .map(|d| d.join("resona").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

    if path.exists() {
        Ok(path)
    } else {
        Err(Error::Config(format!("Config file not found: {:?}", path)))
    }
}

/// OS-dependent default music folder.
///
/// Falls back to the user's home directory `Music` subfolder when the
/// platform does not report a dedicated audio directory.
pub fn default_music_folder() -> PathBuf {
    if let Some(dir) = dirs::audio_dir() {
        return dir;
    }
    dirs::home_dir()
        .map(|d| d.join("Music"))
        .unwrap_or_else(|| PathBuf::from("Music"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_argument_wins() {
        let toml = PathBuf::from("/from/toml");
        let resolved = resolve_music_folder(
            Some(Path::new("/from/cli")),
            "RESONA_TEST_UNSET_MUSIC_FOLDER",
            Some(&toml),
        );
        assert_eq!(resolved, PathBuf::from("/from/cli"));
    }

    #[test]
    fn test_env_var_beats_toml() {
        std::env::set_var("RESONA_TEST_MUSIC_FOLDER_A", "/from/env");
        let toml = PathBuf::from("/from/toml");
        let resolved = resolve_music_folder(None, "RESONA_TEST_MUSIC_FOLDER_A", Some(&toml));
        assert_eq!(resolved, PathBuf::from("/from/env"));
        std::env::remove_var("RESONA_TEST_MUSIC_FOLDER_A");
    }

    #[test]
    fn test_toml_beats_default() {
        let toml = PathBuf::from("/from/toml");
        let resolved = resolve_music_folder(None, "RESONA_TEST_UNSET_MUSIC_FOLDER", Some(&toml));
        assert_eq!(resolved, PathBuf::from("/from/toml"));
    }

    #[test]
    fn test_default_music_folder_is_not_empty() {
        let folder = default_music_folder();
        assert!(!folder.as_os_str().is_empty());
    }
}
