//! Preferences file save/load operations

use super::EditorPreferences;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const PREFERENCES_FILE: &str = "preferences.json";

/// Failure reading or writing the preferences file
#[derive(Debug)]
pub enum PreferencesError {
    /// The file or its directory could not be read or written
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file exists but is not valid preferences JSON
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    Serialize(serde_json::Error),
    /// The platform has no per-user config directory
    NoConfigDir,
}

impl PreferencesError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| PreferencesError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl std::fmt::Display for PreferencesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreferencesError::Io { path, source } => {
                write!(f, "cannot access {}: {}", path.display(), source)
            }
            PreferencesError::Parse { path, source } => {
                write!(f, "invalid preferences in {}: {}", path.display(), source)
            }
            PreferencesError::Serialize(e) => write!(f, "cannot encode preferences: {}", e),
            PreferencesError::NoConfigDir => write!(f, "no config directory on this platform"),
        }
    }
}

impl std::error::Error for PreferencesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PreferencesError::Io { source, .. } => Some(source),
            PreferencesError::Parse { source, .. } => Some(source),
            PreferencesError::Serialize(e) => Some(e),
            PreferencesError::NoConfigDir => None,
        }
    }
}

impl EditorPreferences {
    /// Get the config directory path for the editor
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "tilestack", "tilestack_editor")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the preferences file path
    pub fn preferences_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join(PREFERENCES_FILE))
    }

    /// Load preferences from the config directory, returning defaults if
    /// they cannot be read
    pub fn load() -> Self {
        let loaded = Self::preferences_path()
            .ok_or(PreferencesError::NoConfigDir)
            .and_then(|path| Self::load_from(&path));
        match loaded {
            Ok(prefs) => prefs,
            Err(e) => {
                bevy::log::warn!("Could not load preferences: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Load preferences from a specific file. A missing file gives defaults.
    pub fn load_from(path: &Path) -> Result<Self, PreferencesError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(PreferencesError::io(path))?;
        serde_json::from_str(&content).map_err(|source| PreferencesError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save preferences to the config directory
    pub fn save(&self) -> Result<(), PreferencesError> {
        let path = Self::preferences_path().ok_or(PreferencesError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save preferences to a specific file, creating its directory
    pub fn save_to(&self, path: &Path) -> Result<(), PreferencesError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(PreferencesError::io(dir))?;
        }

        let content = serde_json::to_string_pretty(self).map_err(PreferencesError::Serialize)?;
        std::fs::write(path, content).map_err(PreferencesError::io(path))?;

        bevy::log::info!("Saved preferences to {:?}", path);
        Ok(())
    }
}
