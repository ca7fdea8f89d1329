//! Application configuration.

use driftboard_core::storage::{FileStorage, StorageResult};
use driftboard_core::{LayoutConfig, SessionMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Project key must not be empty")]
    EmptyProjectKey,
}

/// Settings for a board session, read from an optional JSON file.
/// Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Key the board is saved under.
    pub project_key: String,
    /// Where boards are stored. `None` means the platform data directory.
    pub storage_dir: Option<PathBuf>,
    /// Example boards are never written to storage.
    pub example: bool,
    pub autosave_interval_secs: u64,
    pub layout: LayoutConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project_key: "default".to_string(),
            storage_dir: None,
            example: false,
            autosave_interval_secs: driftboard_core::storage::DEFAULT_AUTOSAVE_INTERVAL_SECS,
            layout: LayoutConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, otherwise use the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_json_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project_key.trim().is_empty() {
            return Err(ConfigError::EmptyProjectKey);
        }
        Ok(())
    }

    pub fn mode(&self) -> SessionMode {
        SessionMode::from_example_flag(self.example)
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs)
    }

    pub fn storage_path(&self) -> StorageResult<PathBuf> {
        match &self.storage_dir {
            Some(dir) => Ok(dir.clone()),
            None => FileStorage::default_path(),
        }
    }
}
