//! Logging setup shared by the library's embedders
//!
//! Supports:
//! - Text, JSON, and pretty-printed output
//! - Environment variable configuration
//! - Per-module log level filtering through `RUST_LOG`
//!
//! # Examples
//!
//! ```no_run
//! use libco2footprint::logging::{LoggingConfig, LogFormat};
//!
//! LoggingConfig::new(LogFormat::Json, "info".to_string(), false)
//!     .init()
//!     .expect("logging already initialized");
//!
//! // Or respect CO2FOOTPRINT_LOG_FORMAT / CO2FOOTPRINT_LOG_LEVEL
//! let _ = libco2footprint::logging::init_default();
//! ```

use std::str::FromStr;

use tracing_subscriber::EnvFilter;

use crate::error::{Co2Error, Result};

pub const LOG_FORMAT_ENV: &str = "CO2FOOTPRINT_LOG_FORMAT";
pub const LOG_LEVEL_ENV: &str = "CO2FOOTPRINT_LOG_LEVEL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable text output (no colors, for piping)
    Text,
    /// Machine-parseable JSON (one JSON object per line)
    Json,
    /// Pretty-printed with colors (for development)
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(format!(
                "Invalid log format: '{}'. Valid options: text, json, pretty",
                s
            )),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
            LogFormat::Pretty => write!(f, "pretty"),
        }
    }
}

/// Configuration for logging initialization
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: String,
    pub verbose: bool,
}

impl LoggingConfig {
    /// * `format` - Log output format (text, json, or pretty)
    /// * `level` - Minimum log level (error, warn, info, debug, trace)
    /// * `verbose` - If true, defaults to debug level
    pub fn new(format: LogFormat, level: String, verbose: bool) -> Self {
        Self {
            format,
            level,
            verbose,
        }
    }

    /// Filter directive used when `RUST_LOG` is not set
    pub fn default_directive(&self) -> &str {
        if self.verbose {
            "debug"
        } else {
            &self.level
        }
    }

    /// Install the global subscriber
    ///
    /// Fails instead of panicking when a subscriber is already installed,
    /// since the store may be embedded in a host that set up its own.
    pub fn init(&self) -> Result<()> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_directive()));

        let installed = match self.format {
            LogFormat::Json => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .flatten_event(true)
                .with_target(true)
                .try_init(),
            LogFormat::Pretty => tracing_subscriber::fmt()
                .pretty()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true)
                .try_init(),
            LogFormat::Text => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(false)
                .with_level(true)
                .try_init(),
        };

        installed.map_err(|e| Co2Error::Logging(e.to_string()))
    }
}

/// Build the logging configuration from the environment
///
/// Falls back to text format with warn level if not set.
pub fn config_from_env() -> LoggingConfig {
    let format = std::env::var(LOG_FORMAT_ENV)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(LogFormat::Text);

    let level = std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| "warn".to_string());

    LoggingConfig::new(format, level, false)
}

/// Initialize logging with settings from the environment
pub fn init_default() -> Result<()> {
    config_from_env().init()
}
