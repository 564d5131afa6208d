use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::settings::Settings;

const CONFIG_DIR: &str = "discover-overlay";
const SETTINGS_FILE: &str = "settings.json";
pub const LOCK_FILE: &str = "discover-overlay.pid";
pub const RPC_FILE: &str = "discover-overlay.rpc";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("settings I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid settings file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Per-user configuration directory; everything this app persists lives here.
pub fn config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME") {
        return PathBuf::from(dir).join(CONFIG_DIR);
    }
    if let Some(home) = std::env::var_os("HOME") {
        return PathBuf::from(home).join(".config").join(CONFIG_DIR);
    }
    std::env::temp_dir().join(CONFIG_DIR)
}

pub fn ensure_config_dir() -> Result<PathBuf, StorageError> {
    let dir = config_dir();
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Load settings, falling back to defaults when the file is missing or
/// cannot be parsed. A corrupt file is reported but never fatal.
pub fn load_settings() -> Settings {
    let path = config_dir().join(SETTINGS_FILE);
    match read_settings(&path) {
        Ok(settings) => settings,
        Err(StorageError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
            Settings::default()
        }
        Err(err) => {
            log::warn!("Unreadable settings file, using defaults: {err}");
            Settings::default()
        }
    }
}

pub fn save_settings(settings: &Settings) -> Result<(), StorageError> {
    let dir = ensure_config_dir()?;
    write_settings(&dir.join(SETTINGS_FILE), settings)
}

fn read_settings(path: &Path) -> Result<Settings, StorageError> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn write_settings(path: &Path, settings: &Settings) -> Result<(), StorageError> {
    let payload = serde_json::to_string_pretty(settings)?;
    // Write through a sibling tmp file so readers never observe a torn file.
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, payload)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);

        let mut settings = Settings::default();
        settings.voice.icon_size = 64;
        settings.text.enabled = false;
        settings.general.xoffset = -20;

        write_settings(&path, &settings).unwrap();
        let loaded = read_settings(&path).unwrap();

        assert_eq!(loaded.voice.icon_size, 64);
        assert!(!loaded.text.enabled);
        assert_eq!(loaded.general.xoffset, -20);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn corrupt_settings_are_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            read_settings(&path),
            Err(StorageError::Parse(_))
        ));
    }
}
