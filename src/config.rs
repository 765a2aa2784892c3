//! Configuration loading and management for ircompare.
//!
//! Loads settings from `ircompare.toml` with environment variable overrides
//! for endpoints and API keys.

use crate::locale::Locale;
use crate::models::{self, LlmModel, Provider, DEPLOYMENT_ENV_VARS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_FILE: &str = "ircompare.toml";
const DEFAULT_AZURE_API_VERSION: &str = "2024-02-15-preview";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Azure OpenAI connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

/// Gemini connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
}

/// Where prompt template files live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplatesConfig {
    pub dir: PathBuf,
}

/// Outbound HTTP settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub locale: Locale,
    #[serde(default)]
    pub templates: TemplatesConfig,
    #[serde(default)]
    pub azure: AzureConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default = "models::default_models")]
    pub models: Vec<LlmModel>,
}

impl Config {
    /// Load configuration from the default location (ircompare.toml in cwd or home).
    ///
    /// Without a config file the defaults are used; environment variables
    /// are applied either way.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::find_config_file() {
            Some(path) => Self::load_from(&path),
            None => {
                log::debug!("no {} found, using defaults", CONFIG_FILE);
                let mut config = Config::default();
                config.apply_env(|key| std::env::var(key).ok());
                Ok(config)
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        log::debug!("loaded config from {}", path.display());

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        // Check current directory first
        let local_config = PathBuf::from(CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }

        // Check home directory
        let home_config = dirs::home_dir()?
            .join(".config")
            .join("ircompare")
            .join(CONFIG_FILE);
        home_config.exists().then_some(home_config)
    }

    /// Override secrets and endpoints from the environment
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup("AZURE_OPENAI_ENDPOINT") {
            self.azure.endpoint = Some(endpoint);
        }
        if let Some(key) = lookup("AZURE_OPENAI_API_KEY") {
            self.azure.api_key = Some(key);
        }
        if let Some(version) = lookup("AZURE_OPENAI_API_VERSION") {
            self.azure.api_version = version;
        }
        if let Some(key) = lookup("GEMINI_API_KEY") {
            self.gemini.api_key = Some(key);
        }

        for (model_id, var) in DEPLOYMENT_ENV_VARS {
            if let Some(deployment) = lookup(var) {
                if let Some(model) = self.models.iter_mut().find(|m| m.id == *model_id) {
                    model.deployment_name = Some(deployment);
                }
            }
        }
    }

    pub fn azure_configured(&self) -> bool {
        is_set(&self.azure.endpoint) && is_set(&self.azure.api_key)
    }

    pub fn gemini_configured(&self) -> bool {
        is_set(&self.gemini.api_key)
    }

    pub fn provider_configured(&self, provider: Provider) -> bool {
        match provider {
            Provider::AzureOpenai => self.azure_configured(),
            Provider::Gemini => self.gemini_configured(),
        }
    }

    pub fn has_any_provider(&self) -> bool {
        self.azure_configured() || self.gemini_configured()
    }

    pub fn find_model(&self, id: &str) -> Option<&LlmModel> {
        models::find_model(&self.models, id)
    }
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn default_api_version() -> String {
    DEFAULT_AZURE_API_VERSION.to_string()
}

fn default_gemini_base_url() -> String {
    DEFAULT_GEMINI_BASE_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            templates: TemplatesConfig::default(),
            azure: AzureConfig::default(),
            gemini: GeminiConfig::default(),
            http: HttpConfig::default(),
            models: models::default_models(),
        }
    }
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            api_version: default_api_version(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_gemini_base_url(),
        }
    }
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("prompts").join("templates"),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 120 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.locale, Locale::Japanese);
        assert_eq!(config.azure.api_version, "2024-02-15-preview");
        assert_eq!(config.templates.dir, PathBuf::from("prompts/templates"));
        assert_eq!(config.models.len(), 5);
        assert!(!config.has_any_provider());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env(env(&[
            ("AZURE_OPENAI_ENDPOINT", "https://example.openai.azure.com"),
            ("AZURE_OPENAI_API_KEY", "secret"),
            ("AZURE_OPENAI_GPT4O_DEPLOYMENT", "prod-gpt4o"),
        ]));
        assert!(config.azure_configured());
        assert!(!config.gemini_configured());
        assert!(config.provider_configured(Provider::AzureOpenai));
        assert_eq!(config.find_model("azure-gpt-4o").unwrap().deployment(), "prod-gpt4o");
        assert_eq!(config.find_model("azure-gpt-4o-mini").unwrap().deployment(), "gpt-4o-mini");
    }

    #[test]
    fn test_blank_key_is_not_configured() {
        let mut config = Config::default();
        config.apply_env(env(&[("GEMINI_API_KEY", "  ")]));
        assert!(!config.gemini_configured());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
locale = "en"

[templates]
dir = "/srv/prompts"

[gemini]
api_key = "from-file"

[http]
timeout_secs = 30
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.locale, Locale::English);
        assert_eq!(config.templates.dir, PathBuf::from("/srv/prompts"));
        assert_eq!(config.gemini.base_url, "https://generativelanguage.googleapis.com/v1beta");
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.models.len(), 5);
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "locale = [").unwrap();
        assert!(matches!(Config::load_from(file.path()), Err(ConfigError::ParseError(_))));
    }
}
