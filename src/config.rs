/// Application settings
///
/// Stored as JSON in the user's config directory:
/// - Linux: ~/.config/pharma-viewer/settings.json
/// - macOS: ~/Library/Application Support/pharma-viewer/settings.json
/// - Windows: %APPDATA%\pharma-viewer\settings.json
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::error::AppError;

const APP_DIR: &str = "pharma-viewer";
const SETTINGS_FILE: &str = "settings.json";
const STORE_FILE: &str = "pharma_data.csv";

/// Overrides the dataset folder
pub const DATASET_ENV: &str = "PHARMA_DATASET_DIR";
/// Overrides the record store file
pub const STORE_ENV: &str = "PHARMA_STORE_PATH";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Settings {
    /// Folder holding one subfolder of images per drug
    #[serde(default)]
    pub dataset_dir: Option<PathBuf>,
    /// CSV file that saved annotations go to
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dataset_dir: None,
            store_path: default_store_path(),
        }
    }
}

/// <data_dir>/pharma-viewer/pharma_data.csv, or the working directory as a
/// last resort
fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_default()
        .join(STORE_FILE)
}

impl Settings {
    /// Where the settings file lives, if the platform has a config directory
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
    }

    /// Load the user's settings and apply environment overrides
    pub fn load() -> Result<Self, AppError> {
        let mut settings = match Self::settings_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        settings.apply_overrides(
            std::env::var_os(DATASET_ENV).map(PathBuf::from),
            std::env::var_os(STORE_ENV).map(PathBuf::from),
        );
        Ok(settings)
    }

    /// Read settings from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::Settings(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| AppError::Settings(format!("Failed to parse {}: {}", path.display(), e)))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::Settings(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Settings(format!("Failed to serialize settings: {}", e)))?;
        fs::write(path, json)
            .map_err(|e| AppError::Settings(format!("Failed to write {}: {}", path.display(), e)))
    }

    /// Store `dataset_dir` in the settings file, leaving everything else as
    /// the file has it. Environment overrides never reach the file.
    pub fn remember_dataset_dir(dataset_dir: &Path) -> Result<(), AppError> {
        let path = Self::settings_path()
            .ok_or_else(|| AppError::Settings("no config directory on this platform".to_string()))?;
        Self::remember_dataset_dir_at(&path, dataset_dir)
    }

    pub fn remember_dataset_dir_at(path: &Path, dataset_dir: &Path) -> Result<(), AppError> {
        let mut stored = Self::load_from(path)?;
        stored.dataset_dir = Some(dataset_dir.to_path_buf());
        stored.save_to(path)
    }

    /// Environment values win over whatever the file said
    pub fn apply_overrides(&mut self, dataset_dir: Option<PathBuf>, store_path: Option<PathBuf>) {
        if let Some(dir) = dataset_dir {
            self.dataset_dir = Some(dir);
        }
        if let Some(path) = store_path {
            self.store_path = path;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.store_path.ends_with("pharma_data.csv"));
    }

    #[test]
    fn test_settings_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg").join("settings.json");
        let settings = Settings {
            dataset_dir: Some(PathBuf::from("/data/Drug Vision")),
            store_path: PathBuf::from("/data/annotations.csv"),
        };

        settings.save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "dataset_dir": "/data/drugs" }"#).unwrap();

        let settings = Settings::load_from(&path).unwrap();

        assert_eq!(settings.dataset_dir, Some(PathBuf::from("/data/drugs")));
        assert_eq!(settings.store_path, default_store_path());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Settings::load_from(&path), Err(AppError::Settings(_))));
    }

    #[test]
    fn test_remembered_folder_keeps_file_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        Settings {
            dataset_dir: None,
            store_path: PathBuf::from("/data/annotations.csv"),
        }
        .save_to(&path)
        .unwrap();

        // An env override applied in memory must not leak into the file
        let mut running = Settings::load_from(&path).unwrap();
        running.apply_overrides(None, Some(PathBuf::from("/tmp/one-off.csv")));
        assert_eq!(running.store_path, PathBuf::from("/tmp/one-off.csv"));

        Settings::remember_dataset_dir_at(&path, Path::new("/data/Drug Vision")).unwrap();

        let stored = Settings::load_from(&path).unwrap();
        assert_eq!(stored.dataset_dir, Some(PathBuf::from("/data/Drug Vision")));
        assert_eq!(stored.store_path, PathBuf::from("/data/annotations.csv"));
    }

    #[test]
    fn test_remembered_folder_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg").join("settings.json");

        Settings::remember_dataset_dir_at(&path, Path::new("/data/drugs")).unwrap();

        let stored = Settings::load_from(&path).unwrap();
        assert_eq!(stored.dataset_dir, Some(PathBuf::from("/data/drugs")));
        assert_eq!(stored.store_path, default_store_path());
    }

    #[test]
    fn test_overrides_replace_values() {
        let mut settings = Settings::default();
        settings.apply_overrides(Some(PathBuf::from("/env/data")), None);
        assert_eq!(settings.dataset_dir, Some(PathBuf::from("/env/data")));
        assert_eq!(settings.store_path, default_store_path());

        settings.apply_overrides(None, Some(PathBuf::from("/env/store.csv")));
        assert_eq!(settings.store_path, PathBuf::from("/env/store.csv"));
    }
}
