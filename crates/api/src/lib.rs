//! DevRev API client utilities.
//!
//! This crate provides the remote half of the MCP adapter:
//!
//! - [`ApiConfig`]: credential, base URL and timeout, resolved once at startup
//! - [`RemoteClient`]: the narrow seam the dispatcher depends on
//! - [`DevRevClient`]: the `reqwest`-backed implementation
//!
//! Every DevRev endpoint is a JSON `POST` to `<base>/<endpoint>`, so a call is
//! fully described by an endpoint name and a body.
//!
//! # Example
//!
//! ```ignore
//! use devrev_api::{ApiConfig, DevRevClient, RemoteClient};
//!
//! async fn whoami() -> anyhow::Result<()> {
//!     let client = DevRevClient::new(&ApiConfig::from_env()?)?;
//!     let result = client.call("dev-users.self", &serde_json::Map::new()).await?;
//!     println!("status: {}", result.status_code);
//!     Ok(())
//! }
//! ```

mod config;

pub use config::{API_BASE_ENV, API_KEY_ENV, ApiConfig, ConfigError, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, validate_base_url};

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use devrev_types::{Arguments, RemoteResult};
use reqwest::{Client, RequestBuilder, header};
use thiserror::Error;
use tracing::debug;

/// Transport-level failures of a remote call.
///
/// A call that reaches the API and returns any status code is not an error;
/// these variants cover requests that never produced a response.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("DevRev API request failed for endpoint '{endpoint}': {message}")]
    Transport { endpoint: String, message: String },

    #[error("DevRev API request to '{endpoint}' timed out after {timeout_ms}ms")]
    Timeout { endpoint: String, timeout_ms: u64 },
}

impl ApiError {
    pub fn transport(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    pub fn timeout(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self::Timeout {
            endpoint: endpoint.into(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Issues exactly one request per call. Implementations must not retry or cache.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    async fn call(&self, endpoint: &str, body: &Arguments) -> Result<RemoteResult, ApiError>;
}

/// Thin wrapper around a configured `reqwest::Client` for DevRev API access.
///
/// Authentication and content headers are installed as client defaults, so
/// each request only carries its endpoint and JSON body.
#[derive(Debug, Clone)]
pub struct DevRevClient {
    config: ApiConfig,
    http: Client,
    user_agent: String,
}

impl DevRevClient {
    /// Build a client from explicit configuration.
    pub fn new(config: &ApiConfig) -> Result<Self, ConfigError> {
        let mut authorization = header::HeaderValue::from_str(&config.authorization_value())
            .map_err(|error| ConfigError::InvalidCredential { reason: error.to_string() })?;
        authorization.set_sensitive(true);

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::AUTHORIZATION, authorization);
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        default_headers.insert(header::CONTENT_TYPE, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(config.timeout())
            .build()
            .map_err(|error| ConfigError::HttpClient { reason: error.to_string() })?;

        Ok(Self {
            config: config.clone(),
            http,
            user_agent: format!("devrev-mcp/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    /// Build a `POST` request for a named endpoint.
    pub fn request(&self, endpoint: &str) -> RequestBuilder {
        let url = self.config.endpoint_url(endpoint);
        debug!(%url, "building request");

        self.http
            .post(url)
            .header(header::USER_AGENT, &self.user_agent)
    }

    fn map_send_error(&self, endpoint: &str, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::timeout(endpoint, self.config.timeout())
        } else {
            ApiError::transport(endpoint, error.to_string())
        }
    }
}

#[async_trait]
impl RemoteClient for DevRevClient {
    async fn call(&self, endpoint: &str, body: &Arguments) -> Result<RemoteResult, ApiError> {
        let response = self
            .request(endpoint)
            .json(body)
            .send()
            .await
            .map_err(|error| self.map_send_error(endpoint, error))?;

        let status_code = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|error| self.map_send_error(endpoint, error))?;
        debug!(endpoint, status_code, bytes = text.len(), "received response");

        Ok(RemoteResult::new(status_code, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_builds_from_config() {
        let config = ApiConfig::new("token", DEFAULT_BASE_URL).unwrap();
        let client = DevRevClient::new(&config).expect("client");
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert!(client.user_agent.starts_with("devrev-mcp/"));
    }

    #[test]
    fn request_targets_endpoint_url() {
        let config = ApiConfig::new("token", "http://localhost:1234").unwrap();
        let client = DevRevClient::new(&config).unwrap();
        let request = client.request("works.get").build().expect("request");
        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().as_str(), "http://localhost:1234/works.get");
    }

    #[test]
    fn credential_with_control_characters_is_rejected() {
        let config = ApiConfig::new("bad\ntoken", DEFAULT_BASE_URL).unwrap();
        assert!(matches!(
            DevRevClient::new(&config),
            Err(ConfigError::InvalidCredential { .. })
        ));
    }

    #[test]
    fn timeout_error_reports_milliseconds() {
        let error = ApiError::timeout("works.list", Duration::from_secs(2));
        assert_eq!(
            error.to_string(),
            "DevRev API request to 'works.list' timed out after 2000ms"
        );
    }
}
