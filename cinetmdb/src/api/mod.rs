//! Low-level access layer for the TMDB REST API
//!
//! This module provides the HTTP plumbing shared by every endpoint wrapper:
//! one pooled `reqwest` client, API-key injection, and uniform handling of
//! the TMDB error envelope.

pub mod catalog;

use crate::error::{Result, TmdbError};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Connection settings for the underlying HTTP client
///
/// Remote calls are synchronous from the caller's point of view: a request
/// blocks its task until response or timeout, bounded by the pool below.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Overall per-request timeout
    pub request_timeout: Duration,
    /// Maximum idle pooled connections per host
    pub pool_max_per_host: usize,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            pool_max_per_host: 8,
        }
    }
}

/// Low-level API client for TMDB
pub struct TmdbApi {
    /// HTTP client
    client: Client,
    /// API key appended to every request
    api_key: String,
    /// Base URL, overridable for tests
    base_url: String,
}

impl TmdbApi {
    /// Creates a new API instance with default connection settings
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        Self::with_settings(api_key, base_url, ApiSettings::default())
    }

    /// Creates a new API instance with explicit connection settings
    pub fn with_settings(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        settings: ApiSettings,
    ) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .pool_max_idle_per_host(settings.pool_max_per_host)
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
        })
    }

    /// Returns the configured base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Performs a GET request against the API
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);

        debug!("GET {} with {} params", url, params.len());

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Processes an HTTP response
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();
        let status_code = status.as_u16();

        debug!("Response status: {}", status);

        let text = response.text().await?;

        if !status.is_success() {
            // TMDB wraps failures in {"status_code": .., "status_message": ".."}
            if let Ok(json) = serde_json::from_str::<Value>(&text) {
                if let Some(message) = json.get("status_message").and_then(|m| m.as_str()) {
                    warn!("TMDB API error ({}): {}", status_code, message);
                    return Err(TmdbError::from_status_code(status_code, message));
                }
            }
            warn!("API error ({}): {}", status_code, text);
            return Err(TmdbError::from_status_code(status_code, text));
        }

        serde_json::from_str(&text).map_err(|e| {
            warn!("Failed to parse response: {}", e);
            TmdbError::JsonParse(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_creation() {
        let api = TmdbApi::new("test_key", "https://api.themoviedb.org/3").unwrap();
        assert_eq!(api.base_url(), "https://api.themoviedb.org/3");
    }

    #[test]
    fn test_default_settings() {
        let settings = ApiSettings::default();
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        assert_eq!(settings.pool_max_per_host, 8);
    }
}
