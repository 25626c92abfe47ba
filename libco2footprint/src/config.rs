//! Configuration management
//!
//! Settings come from a TOML file (see [`resolve_config_path`]) with the API
//! key optionally overridden by `CO2FOOTPRINT_API_KEY`.
//!
//! ```toml
//! [api]
//! base_url = "https://api.pace-esg.com/co2footprint/v1/api"
//! api_key = "..."
//!
//! [widget]
//! apply_load_factor = true
//! show_equivalents = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.pace-esg.com/co2footprint/v1/api";

pub const CONFIG_ENV: &str = "CO2FOOTPRINT_CONFIG";
pub const API_KEY_ENV: &str = "CO2FOOTPRINT_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub widget: WidgetConfig,
}

/// Remote calculation API
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Service root; endpoints live under `{base_url}/co2footprint/`
    pub base_url: String,
    /// Sent as the `x-api-key` header
    pub api_key: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
        }
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Behaviour switches exposed by the embedding widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Ask the API to apply the IATA average load factor
    pub apply_load_factor: bool,
    /// Show equivalent metrics (car km, trees, ...) next to the results
    pub show_equivalents: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            apply_load_factor: false,
            show_equivalents: true,
        }
    }
}

impl Config {
    /// Load configuration from the default location
    ///
    /// A missing file is not an error: the defaults are used and the API key
    /// can still come from the environment.
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        let config = if config_path.exists() {
            Self::load_from_path(&config_path)?
        } else {
            tracing::debug!("No config file at {}, using defaults", config_path.display());
            Self::default()
        };
        Ok(config.with_env_overrides())
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        Ok(config)
    }

    /// Apply `CO2FOOTPRINT_API_KEY` if it is set and non-empty
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.api.api_key = key;
            }
        }
        self
    }

    /// Check that the gateways can be built from this configuration
    pub fn validate(&self) -> Result<()> {
        if self.api.api_key.trim().is_empty() {
            return Err(ConfigError::MissingField("api.api_key".to_string()).into());
        }

        let base_url = self.api.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url".to_string(),
                reason: "must start with http:// or https://".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("co2footprint").join("config.toml"))
}
