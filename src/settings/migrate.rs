//! Schema migration for AI settings
//!
//! Version 1 is the flat shape the web client kept in local storage:
//!
//! ```toml
//! provider = "openai"
//! apiKey = "sk-..."
//! model = "gpt-4o-mini"
//! ```
//!
//! Version 2 keeps one table per provider under `[providers]`. Files without
//! a `version` key are version 1.

use toml::{Table, Value};

use super::models::{AiSettings, Provider, ProviderSettings, Providers, CURRENT_VERSION};
use super::SettingsError;

/// Bring a raw settings table up to the current schema
pub fn migrate(raw: Table) -> Result<AiSettings, SettingsError> {
    let version = match raw.get("version") {
        None => 1,
        Some(Value::Integer(v)) => *v,
        Some(other) => {
            return Err(SettingsError::InvalidShape(format!(
                "version must be an integer, found {}",
                other.type_str()
            )))
        }
    };

    match version {
        1 => {
            log::info!("Migrating AI settings from version 1 to {}", CURRENT_VERSION);
            migrate_v1(&raw)
        }
        2 => migrate_v2(raw),
        other => Err(SettingsError::UnsupportedVersion(other)),
    }
}

/// Migrate a browser local-storage export (JSON)
pub fn import_legacy_json(json: &str) -> Result<AiSettings, SettingsError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    match json_to_toml(value) {
        Some(Value::Table(table)) => migrate(table),
        _ => Err(SettingsError::InvalidShape(
            "expected a JSON object".to_string(),
        )),
    }
}

fn migrate_v1(raw: &Table) -> Result<AiSettings, SettingsError> {
    let provider = match string_field(raw, &["provider", "aiProvider"])? {
        Some(name) => name.parse::<Provider>()?,
        None => Provider::default(),
    };

    let mut settings = AiSettings {
        active_provider: provider,
        ..Default::default()
    };

    let entry = settings.providers.get_or_default(provider);
    if let Some(key) = string_field(raw, &["apiKey", "api_key"])? {
        if !key.is_empty() {
            entry.api_key = Some(key);
        }
    }
    if let Some(model) = string_field(raw, &["model"])? {
        if !model.is_empty() {
            entry.model = model;
        }
    }
    if let Some(url) = string_field(raw, &["baseUrl", "base_url"])? {
        entry.base_url = Some(url);
    }

    Ok(settings)
}

/// Provider names go through the same aliases as version 1, and missing
/// fields fall back to each provider's defaults
fn migrate_v2(mut raw: Table) -> Result<AiSettings, SettingsError> {
    let active_provider = match string_field(&raw, &["active_provider"])? {
        Some(name) => name.parse::<Provider>()?,
        None => Provider::default(),
    };

    let mut providers = Providers::default();
    match raw.remove("providers") {
        None => {}
        Some(Value::Table(tables)) => {
            for (name, value) in tables {
                let provider = name.parse::<Provider>()?;
                if !value.is_table() {
                    return Err(SettingsError::InvalidShape(format!(
                        "providers.{} must be a table, found {}",
                        name,
                        value.type_str()
                    )));
                }
                let entry: ProviderSettings = value.try_into()?;
                providers.insert(provider, entry.with_defaults(provider));
            }
        }
        Some(other) => {
            return Err(SettingsError::InvalidShape(format!(
                "providers must be a table, found {}",
                other.type_str()
            )))
        }
    }

    Ok(AiSettings {
        version: CURRENT_VERSION,
        active_provider,
        providers,
    })
}

/// First present key among `names`; must be a string if present
fn string_field(raw: &Table, names: &[&str]) -> Result<Option<String>, SettingsError> {
    for name in names {
        match raw.get(*name) {
            Some(Value::String(s)) => return Ok(Some(s.clone())),
            Some(other) => {
                return Err(SettingsError::InvalidShape(format!(
                    "{} must be a string, found {}",
                    name,
                    other.type_str()
                )))
            }
            None => {}
        }
    }
    Ok(None)
}

/// TOML has no null; null values are dropped
fn json_to_toml(value: serde_json::Value) -> Option<Value> {
    use serde_json::Value as Json;

    match value {
        Json::Null => None,
        Json::Bool(b) => Some(Value::Boolean(b)),
        Json::Number(n) => n
            .as_i64()
            .map(Value::Integer)
            .or_else(|| n.as_f64().map(Value::Float)),
        Json::String(s) => Some(Value::String(s)),
        Json::Array(items) => Some(Value::Array(
            items.into_iter().filter_map(json_to_toml).collect(),
        )),
        Json::Object(map) => Some(Value::Table(
            map.into_iter()
                .filter_map(|(k, v)| json_to_toml(v).map(|v| (k, v)))
                .collect(),
        )),
    }
}
