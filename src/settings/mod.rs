//! AI provider settings
//!
//! Settings live in a TOML file with an explicit schema version. Older
//! shapes are migrated once when the file is loaded; everything past
//! [`AiSettings::load`] only ever sees the current schema.

pub mod migrate;
pub mod models;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use migrate::{import_legacy_json, migrate};
pub use models::{mask_key, AiSettings, Provider, ProviderSettings, Providers, CURRENT_VERSION};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported settings version: {0}")]
    UnsupportedVersion(i64),

    #[error("Unknown AI provider: {0}")]
    UnknownProvider(String),

    #[error("Invalid settings: {0}")]
    InvalidShape(String),

    #[error("Could not determine config directory")]
    ConfigDirNotFound,
}

pub type Result<T> = std::result::Result<T, SettingsError>;

/// `<config dir>/studydeck/settings.toml`
pub fn default_settings_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|p| p.join("studydeck").join("settings.toml"))
        .ok_or(SettingsError::ConfigDirNotFound)
}

impl AiSettings {
    /// Load settings from `path`, migrating older versions.
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let raw: toml::Table = content.parse()?;
        migrate(raw)
    }

    /// Write settings to `path` in the current schema
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut current = self.clone();
        current.version = CURRENT_VERSION;
        fs::write(path, toml::to_string_pretty(&current)?)?;
        log::debug!("Saved AI settings to {:?}", path);
        Ok(())
    }
}
