//! Settings shared by ingestion and query time, persisted as `config.toml`.

pub(crate) mod defaults;

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::FingerprintConfig;
use crate::app_dirs::{self, AppDirError};
use crate::matching::MatchSettings;
use defaults::default_music_dir;

/// File name used for the settings file inside the app root.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// File name of the default catalog database inside the app root.
pub const DATABASE_FILE_NAME: &str = "catalog.db";
/// Overrides `library.database_path`.
pub const DATABASE_PATH_ENV: &str = "REMIXID_DATABASE_PATH";
/// Overrides `library.music_dir`.
pub const LIBRARY_PATH_ENV: &str = "REMIXID_LIBRARY_PATH";

/// Errors that may occur while loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to create the config directory.
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to read a config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to write a config file.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse TOML config.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Failed to serialize config to TOML.
    #[error("Failed to serialize config to TOML at {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
    /// No usable config directory found.
    #[error("No suitable config directory found")]
    NoConfigDir,
}

fn map_app_dir_error(error: AppDirError) -> ConfigError {
    match error {
        AppDirError::NoBaseDir => ConfigError::NoConfigDir,
        AppDirError::CreateDir { path, source } => ConfigError::CreateDir { path, source },
    }
}

/// Where the reference tracks and the catalog database live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Directory walked by `index`.
    #[serde(default = "default_music_dir")]
    pub music_dir: PathBuf,
    /// Catalog database; defaults to `catalog.db` in the app root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            music_dir: default_music_dir(),
            database_path: None,
        }
    }
}

impl LibraryConfig {
    /// Resolve the database path, falling back to the app root.
    pub fn resolved_database_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => Ok(app_dirs::app_root_dir()
                .map_err(map_app_dir_error)?
                .join(DATABASE_FILE_NAME)),
        }
    }
}

/// Everything persisted in `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub fingerprint: FingerprintConfig,
    #[serde(default)]
    pub matching: MatchSettings,
    #[serde(default)]
    pub library: LibraryConfig,
}

impl AppSettings {
    /// Clamp values into their usable ranges.
    pub fn normalized(mut self) -> Self {
        self.fingerprint = self.fingerprint.normalized();
        self.matching = self.matching.normalized();
        self
    }

    /// Apply `REMIXID_*` overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(DATABASE_PATH_ENV).filter(|value| !value.trim().is_empty()) {
            self.library.database_path = Some(PathBuf::from(path.trim()));
        }
        if let Some(path) = lookup(LIBRARY_PATH_ENV).filter(|value| !value.trim().is_empty()) {
            self.library.music_dir = PathBuf::from(path.trim());
        }
    }
}

/// Resolve the configuration file path, ensuring the parent directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dir = app_dirs::app_root_dir().map_err(map_app_dir_error)?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Load settings from the app root with env overrides, returning defaults if missing.
pub fn load_or_default() -> Result<AppSettings, ConfigError> {
    let mut settings = load_from(&config_path()?)?;
    settings.apply_env_overrides(|key| std::env::var(key).ok());
    Ok(settings)
}

/// Load settings from `path`; a missing file yields defaults.
pub fn load_from(path: &Path) -> Result<AppSettings, ConfigError> {
    if !path.exists() {
        return Ok(AppSettings::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str::<AppSettings>(&text)
        .map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
        .map(AppSettings::normalized)
}

/// Persist settings to the app root.
pub fn save(settings: &AppSettings) -> Result<(), ConfigError> {
    save_to(settings, &config_path()?)
}

/// Write the TOML settings file atomically, creating parent directories as needed.
pub fn save_to(settings: &AppSettings, path: &Path) -> Result<(), ConfigError> {
    let data = toml::to_string_pretty(settings).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::CreateDir {
        path: dir.clone(),
        source,
    })?;
    let write_err = |source: std::io::Error| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(write_err)?;
    tmp.write_all(data.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|err| write_err(err.error))?;
    Ok(())
}
