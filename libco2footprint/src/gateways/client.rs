//! Shared HTTP client for the CO2 footprint API

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

use crate::config::ApiConfig;
use crate::error::GatewayError;

/// Header carrying the widget's API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Authenticated access to `{base_url}/co2footprint/*`
///
/// Cheap to clone: the underlying connection pool and key are shared.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Arc<SecretString>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Self {
        Self::with_http(
            reqwest::Client::new(),
            &config.base_url,
            SecretString::from(config.api_key.clone()),
        )
    }

    pub fn with_http(http: reqwest::Client, base_url: &str, api_key: SecretString) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: Arc::new(api_key),
        }
    }

    /// Full URL of an endpoint below `co2footprint/`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/co2footprint/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Issue an authenticated GET
    ///
    /// Any HTTP status is returned as a response; only transport failures
    /// are errors.
    pub async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response, GatewayError> {
        let url = self.endpoint(path);
        tracing::debug!(%url, "GET");

        let response = self
            .http
            .get(&url)
            .query(query)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .send()
            .await?;

        Ok(response)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
