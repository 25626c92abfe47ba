//! Error types for the CO2 footprint engine
//!
//! Only failures the caller cannot recover from in-band are Rust errors.
//! Well-known API rejections (unknown flight number, quota exceeded, ...)
//! are values: see [`crate::types::ErrorInfo`].

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Co2Error>;

#[derive(Error, Debug)]
pub enum Co2Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl Co2Error {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Co2Error::InvalidInput(_) => 3,
            Co2Error::Gateway(GatewayError::Status { status, .. }) if is_access_denied(*status) => 2,
            Co2Error::Gateway(_) => 1,
            Co2Error::Config(_) => 1,
            Co2Error::Store(_) => 1,
            Co2Error::Logging(_) => 1,
        }
    }
}

/// Authentication failures and exhausted quotas
pub fn is_access_denied(status: u16) -> bool {
    matches!(status, 401 | 403 | 429)
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Transport-level and unexpected gateway failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Unexpected status {status} from {endpoint}")]
    Status { endpoint: String, status: u16 },
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Decode(err.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store has been closed")]
    Closed,
}
