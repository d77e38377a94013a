//! Configuration for the guidance client
//!
//! Loads configuration from config.yml file; environment variables take
//! precedence over file values.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::client::AskMode;
use crate::verse::Language;

/// Default constants (fallback if config.yml not found)
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// YAML config structure
#[derive(Debug, Default, Deserialize)]
struct YamlConfig {
    api: Option<ApiConfig>,
    chat: Option<ChatConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiConfig {
    url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatConfig {
    language: Option<String>,
    mode: Option<String>,
}

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub timeout_secs: u64,
    pub default_language: Language,
    pub default_mode: AskMode,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Load configuration from config.yml or use defaults.
    pub fn new() -> Self {
        Self::load_from_file("config.yml")
            .or_else(|_| Self::load_from_file("../config.yml"))
            .unwrap_or_else(|_| Self::defaults())
    }

    pub fn defaults() -> Self {
        Self::from_yaml(YamlConfig::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        // Load .env first so env overrides see it
        let _ = dotenvy::dotenv();

        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let yaml: YamlConfig = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        Ok(Self::from_yaml(yaml))
    }

    fn from_yaml(yaml: YamlConfig) -> Self {
        let api = yaml.api.unwrap_or_default();
        let chat = yaml.chat.unwrap_or_default();

        let api_url = std::env::var("GITA_API_URL")
            .ok()
            .or(api.url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout_secs = std::env::var("GITA_API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(api.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let default_language = chat
            .language
            .and_then(|l| l.parse().ok())
            .unwrap_or_default();

        let default_mode = chat.mode.and_then(|m| m.parse().ok()).unwrap_or_default();

        Self {
            api_url,
            timeout_secs,
            default_language,
            default_mode,
        }
    }
}
