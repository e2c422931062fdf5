use std::path::PathBuf;
use std::time::Duration;

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::gemini::{DEFAULT_API_BASE, DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT, GeminiConfig};
use crate::transcript::{DEFAULT_CALL_TIMEOUT, FetchOptions};

pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const DEFAULT_USER_ID: &str = "local-user-id";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub google_api_key: Option<String>,
    pub model: Option<String>,
    pub api_base: Option<String>,
    pub lang: Option<String>,
    pub call_timeout_secs: Option<u64>,
    pub overall_deadline_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub user_id: Option<String>,
}

impl Config {
    /// Load config from ~/.config/ytlens/config.toml if it exists
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }

    /// `GOOGLE_API_KEY` from the environment wins over the config file
    pub fn api_key(&self, env_value: Option<String>) -> Option<String> {
        env_value
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.google_api_key.clone())
            .filter(|k| !k.trim().is_empty())
    }

    pub fn gemini(&self, env_value: Option<String>) -> GeminiConfig {
        GeminiConfig {
            api_key: self.api_key(env_value),
            model: self.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: self.api_base.clone().unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            request_timeout: self
                .request_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            ..Default::default()
        }
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            call_timeout: self
                .call_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_CALL_TIMEOUT),
            overall_deadline: self.overall_deadline_secs.map(Duration::from_secs),
        }
    }

    pub fn lang(&self) -> &str {
        self.lang.as_deref().unwrap_or("en")
    }

    pub fn user_id(&self) -> &str {
        self.user_id.as_deref().unwrap_or(DEFAULT_USER_ID)
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytlens")
        .join("config.toml")
}
