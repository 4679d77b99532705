//! Client configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Default remote store address.
pub const DEFAULT_API_URL: &str = "http://localhost:7053";

/// Environment variable overriding the remote store address.
pub const API_URL_ENV: &str = "SKETCHLINE_API_URL";

/// Environment variable providing a pre-authenticated owner id.
pub const OWNER_ID_ENV: &str = "SKETCHLINE_OWNER_ID";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings for talking to the remote shape store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Base URL of the store, e.g. `https://example.com`.
    pub api_base_url: String,
    /// Owner id to use without logging in.
    pub owner_id: Option<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            owner_id: None,
        }
    }
}

impl SyncConfig {
    /// Build from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.base_url()?;
        Ok(config)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.api_base_url = url.trim().to_string();
        }
        config.owner_id = lookup(OWNER_ID_ENV).filter(|v| !v.trim().is_empty());
        config.base_url()?;
        log::debug!("Sync config: {:?}", config);
        Ok(config)
    }

    /// Parsed and validated base URL.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.api_base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", self.api_base_url, e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "unsupported scheme: {}",
                url.scheme()
            )));
        }
        Ok(url)
    }
}
