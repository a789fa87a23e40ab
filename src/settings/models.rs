//! AI provider settings

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::SettingsError;

/// Current settings schema version
pub const CURRENT_VERSION: u32 = 2;

/// AI provider used for card generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Provider {
    #[default]
    OpenAi,
    Anthropic,
    Gemini,
    Ollama,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::OpenAi,
        Provider::Anthropic,
        Provider::Gemini,
        Provider::Ollama,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
            Self::Ollama => "ollama",
        }
    }

    /// Model used when none is configured
    pub fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o-mini",
            Self::Anthropic => "claude-3-5-haiku-latest",
            Self::Gemini => "gemini-1.5-flash",
            Self::Ollama => "llama3.1",
        }
    }

    /// Local providers need a server URL rather than an API key
    pub fn default_base_url(self) -> Option<&'static str> {
        match self {
            Self::Ollama => Some("http://localhost:11434"),
            _ => None,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "open_ai" | "open-ai" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "gemini" | "google" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            _ => Err(SettingsError::UnknownProvider(s.to_string())),
        }
    }
}

impl TryFrom<String> for Provider {
    type Error = SettingsError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

/// Credentials and model for one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Empty until filled with the provider's default model
    #[serde(default)]
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl ProviderSettings {
    pub fn for_provider(provider: Provider) -> Self {
        Self {
            api_key: None,
            model: provider.default_model().to_string(),
            base_url: provider.default_base_url().map(str::to_string),
        }
    }

    /// Fill unset fields with `provider`'s defaults
    pub fn with_defaults(mut self, provider: Provider) -> Self {
        if self.model.trim().is_empty() {
            self.model = provider.default_model().to_string();
        }
        if self.base_url.is_none() {
            self.base_url = provider.default_base_url().map(str::to_string);
        }
        self
    }
}

/// Per-provider settings; providers never configured are absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Providers {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai: Option<ProviderSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anthropic: Option<ProviderSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini: Option<ProviderSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ollama: Option<ProviderSettings>,
}

impl Providers {
    pub fn get(&self, provider: Provider) -> Option<&ProviderSettings> {
        self.slot(provider).as_ref()
    }

    /// Settings for `provider`, created with defaults if missing
    pub fn get_or_default(&mut self, provider: Provider) -> &mut ProviderSettings {
        self.slot_mut(provider)
            .get_or_insert_with(|| ProviderSettings::for_provider(provider))
    }

    pub fn insert(&mut self, provider: Provider, settings: ProviderSettings) {
        *self.slot_mut(provider) = Some(settings);
    }

    fn slot(&self, provider: Provider) -> &Option<ProviderSettings> {
        match provider {
            Provider::OpenAi => &self.openai,
            Provider::Anthropic => &self.anthropic,
            Provider::Gemini => &self.gemini,
            Provider::Ollama => &self.ollama,
        }
    }

    fn slot_mut(&mut self, provider: Provider) -> &mut Option<ProviderSettings> {
        match provider {
            Provider::OpenAi => &mut self.openai,
            Provider::Anthropic => &mut self.anthropic,
            Provider::Gemini => &mut self.gemini,
            Provider::Ollama => &mut self.ollama,
        }
    }
}

/// AI settings, always in the current schema once loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiSettings {
    pub version: u32,
    #[serde(default)]
    pub active_provider: Provider,
    #[serde(default)]
    pub providers: Providers,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            active_provider: Provider::default(),
            providers: Providers::default(),
        }
    }
}

impl AiSettings {
    /// Settings of the provider currently in use
    pub fn active(&self) -> Option<&ProviderSettings> {
        self.providers.get(self.active_provider)
    }

    /// Model for the active provider, falling back to its default
    pub fn active_model(&self) -> &str {
        self.active()
            .map(|p| p.model.as_str())
            .unwrap_or_else(|| self.active_provider.default_model())
    }
}

/// Show only the last four characters of an API key
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_names() {
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!("claude".parse::<Provider>().unwrap(), Provider::Anthropic);
        assert!(matches!(
            "cohere".parse::<Provider>(),
            Err(SettingsError::UnknownProvider(_))
        ));
        for provider in Provider::ALL {
            assert_eq!(provider.as_str().parse::<Provider>().unwrap(), provider);
        }
    }

    #[test]
    fn test_active_model_falls_back() {
        let mut settings = AiSettings {
            active_provider: Provider::Gemini,
            ..Default::default()
        };
        assert_eq!(settings.active_model(), "gemini-1.5-flash");

        settings.providers.get_or_default(Provider::Gemini).model = "gemini-pro".to_string();
        assert_eq!(settings.active_model(), "gemini-pro");
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("sk-abcdef1234"), "*********1234");
        assert_eq!(mask_key("abc"), "***");
    }
}
