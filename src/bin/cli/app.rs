use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use studydeck_lib::settings::{default_settings_path, AiSettings};

/// Shared application state for CLI commands
pub struct App {
    pub settings_path: PathBuf,
}

impl App {
    /// Resolve the settings file, falling back to the default location
    pub fn new(settings_path: Option<PathBuf>) -> Result<Self> {
        let settings_path = match settings_path {
            Some(path) => path,
            None => default_settings_path().context("Failed to get config directory")?,
        };

        Ok(Self { settings_path })
    }

    /// Load AI settings, migrating older files
    pub fn load_settings(&self) -> Result<AiSettings> {
        AiSettings::load(&self.settings_path).with_context(|| {
            format!("Failed to load settings from {}", self.settings_path.display())
        })
    }

    /// Read and parse a JSON input file
    pub fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }
}
