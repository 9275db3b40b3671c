//! User configuration loaded from `config.toml`.
//!
//! The file lives in the platform config directory
//! (`$XDG_CONFIG_HOME/sumwise/config.toml` on Linux). Every field is
//! optional; a missing file means defaults.

use crate::calculator::CalculatorMode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Mode the calculator starts in.
    pub mode: CalculatorMode,
    pub ai: AiConfig,
}

/// Remote text service settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub enabled: bool,
    pub backend: AiBackend,
    pub model: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub base_url: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: AiBackend::Google,
            model: "gemini-2.0-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: None,
            temperature: None,
            max_tokens: None,
        }
    }
}

/// Supported hosted model providers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiBackend {
    #[default]
    Google,
    OpenAi,
    Anthropic,
    Ollama,
}

impl AiBackend {
    /// Local backends run without credentials.
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Self::Ollama)
    }
}

impl Config {
    /// Default location of the config file, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sumwise").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// tried and silently skipped when absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    tracing::debug!("no config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}
