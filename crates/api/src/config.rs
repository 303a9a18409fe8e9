//! Process-wide DevRev API configuration.
//!
//! Configuration is resolved once at startup and passed to
//! [`crate::DevRevClient::new`]. A missing credential or an unsafe base URL is
//! a startup failure, never a per-invocation one.

use std::env;
use std::fmt;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Environment variable holding the DevRev personal access token.
pub const API_KEY_ENV: &str = "DEVREV_API_KEY";
/// Environment variable overriding the DevRev API base URL.
pub const API_BASE_ENV: &str = "DEVREV_API_BASE";
/// Public DevRev API.
pub const DEFAULT_BASE_URL: &str = "https://api.devrev.ai";
/// Request timeout applied by the HTTP client.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Allowed hostnames or base domains for non-local base URLs. Subdomains are
/// also allowed.
const ALLOWED_DEVREV_DOMAINS: &[&str] = &["devrev.ai"];
/// Hostnames allowed for local development regardless of scheme.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

/// Errors raised while resolving configuration or building the client.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API authentication not configured: set {env_var}")]
    MissingCredential { env_var: &'static str },

    #[error("Invalid DevRev API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Invalid DevRev API credential: {reason}")]
    InvalidCredential { reason: String },

    #[error("Failed to build HTTP client: {reason}")]
    HttpClient { reason: String },
}

/// Credential, base URL and timeout for the DevRev API.
#[derive(Clone)]
pub struct ApiConfig {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl ApiConfig {
    /// Build a configuration from explicit values.
    ///
    /// The credential must be non-blank and the base URL must pass
    /// [`validate_base_url`]. A trailing slash on the base URL is dropped.
    pub fn new(api_key: impl Into<String>, base_url: &str) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential { env_var: API_KEY_ENV });
        }
        validate_base_url(base_url)?;
        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Resolve configuration from `DEVREV_API_KEY` and `DEVREV_API_BASE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var(API_KEY_ENV).map_err(|_| ConfigError::MissingCredential { env_var: API_KEY_ENV })?;
        let base_url = env::var(API_BASE_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(api_key, &base_url)
    }

    /// Replace the base URL, keeping the credential and timeout.
    pub fn with_base_url(self, base_url: &str) -> Result<Self, ConfigError> {
        let timeout = self.timeout;
        Ok(Self::new(self.api_key, base_url)?.with_timeout(timeout))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Value for the `Authorization` header.
    ///
    /// Keys that already carry a `Bearer ` prefix are sent unchanged.
    pub fn authorization_value(&self) -> String {
        let key = self.api_key.trim();
        if key.get(..7).is_some_and(|prefix| prefix.eq_ignore_ascii_case("bearer ")) {
            key.to_string()
        } else {
            format!("Bearer {key}")
        }
    }

    /// Absolute URL of a named endpoint, e.g. `works.get`.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost` or `127.0.0.1`: any scheme is allowed
/// - otherwise: scheme must be HTTPS, and host must be `devrev.ai` or a
///   subdomain of it
pub fn validate_base_url(base: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: base.to_string(),
        reason,
    };
    let parsed_base_url = Url::parse(base).map_err(|error| invalid(error.to_string()))?;

    let host_name = parsed_base_url
        .host_str()
        .ok_or_else(|| invalid("base URL must include a host".to_string()))?;

    if LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host_name.eq_ignore_ascii_case(allowed))
    {
        return Ok(());
    }

    if parsed_base_url.scheme() != "https" {
        return Err(invalid(format!(
            "must use https for non-localhost hosts; got '{}://'",
            parsed_base_url.scheme()
        )));
    }

    let is_allowed_domain = ALLOWED_DEVREV_DOMAINS.iter().any(|&allowed_domain| {
        host_name.eq_ignore_ascii_case(allowed_domain) || host_name.ends_with(&format!(".{}", allowed_domain))
    });
    if !is_allowed_domain {
        return Err(invalid(format!(
            "host '{}' is not allowed; must be one of {:?} or a subdomain, or localhost",
            host_name, ALLOWED_DEVREV_DOMAINS
        )));
    }

    Ok(())
}
