use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use studydeck_lib::settings::{import_legacy_json, mask_key, AiSettings, Provider, CURRENT_VERSION};

use crate::app::App;
use crate::OutputFormat;

pub fn run_show(app: &App, format: &OutputFormat) -> Result<()> {
    let mut settings = app.load_settings()?;

    // Never print raw keys
    for provider in Provider::ALL {
        if settings.providers.get(provider).is_some() {
            let entry = settings.providers.get_or_default(provider);
            entry.api_key = entry.api_key.as_deref().map(mask_key);
        }
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&settings)?),
        OutputFormat::Plain => {
            println!("Settings: {}", app.settings_path.display());
            println!("Active provider: {} ({})", settings.active_provider, settings.active_model());
            for provider in Provider::ALL {
                let Some(entry) = settings.providers.get(provider) else {
                    continue;
                };
                let marker = if provider == settings.active_provider { "* " } else { "  " };
                let key = entry.api_key.as_deref().unwrap_or("(no key)");
                println!("{}{}: model={} key={}", marker, provider, entry.model, key);
                if let Some(url) = &entry.base_url {
                    println!("    base_url={}", url);
                }
            }
        }
    }

    Ok(())
}

pub fn run_migrate(file: &Path) -> Result<()> {
    let settings = AiSettings::load(file)
        .with_context(|| format!("Failed to load settings from {}", file.display()))?;
    settings
        .save(file)
        .with_context(|| format!("Failed to write {}", file.display()))?;
    println!("Migrated {} to version {}", file.display(), CURRENT_VERSION);
    Ok(())
}

pub fn run_import_legacy(app: &App, json_path: &Path) -> Result<()> {
    let json = fs::read_to_string(json_path)
        .with_context(|| format!("Failed to read {}", json_path.display()))?;
    let settings = import_legacy_json(&json).context("Failed to import legacy settings")?;
    settings
        .save(&app.settings_path)
        .with_context(|| format!("Failed to write {}", app.settings_path.display()))?;
    println!(
        "Imported {} settings into {}",
        settings.active_provider,
        app.settings_path.display()
    );
    Ok(())
}
