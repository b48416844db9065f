//! Application configuration
//!
//! Settings are read from an optional YAML file, then overridden by the
//! environment (`TMDB_API_KEY`, `TMDB_ACCESS_TOKEN`) and finally by CLI
//! flags. Everything except the credential has a default.
//!
//! ```yaml
//! base_url: https://api.themoviedb.org/3
//! api_key: 0123456789abcdef
//! http:
//!   timeout_secs: 15
//!   max_retries: 1
//! ```

use crate::auth::AuthConfig;
use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::tmdb::DEFAULT_IMAGE_BASE_URL;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default TMDB API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Environment variable holding a v3 API key
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Environment variable holding a v4 read access token
pub const ACCESS_TOKEN_ENV: &str = "TMDB_ACCESS_TOKEN";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL for API requests
    pub base_url: String,

    /// Base URL for poster and backdrop images
    pub image_base_url: String,

    /// v3 API key, sent as the `api_key` query parameter
    pub api_key: Option<String>,

    /// v4 read access token, sent as a bearer token; wins over `api_key`
    pub access_token: Option<String>,

    /// HTTP client settings
    pub http: HttpSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            api_key: None,
            access_token: None,
            http: HttpSettings::default(),
        }
    }
}

// ============================================================================
// HTTP Settings
// ============================================================================

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Transport-level retries for 429/5xx/timeouts
    pub max_retries: u32,

    /// Sustained request rate
    pub requests_per_second: u32,

    /// Burst allowance
    pub burst_size: u32,
}

impl Default for HttpSettings {
    fn default() -> Self {
        let rate = RateLimiterConfig::default();
        Self {
            timeout_secs: 30,
            max_retries: 0,
            requests_per_second: rate.requests_per_second,
            burst_size: rate.burst_size,
        }
    }
}

impl AppConfig {
    /// Parse config from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&contents)
    }

    /// Override credentials from the process environment
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Override credentials from an arbitrary variable lookup
    #[must_use]
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(token) = lookup(ACCESS_TOKEN_ENV).filter(|v| !v.is_empty()) {
            self.access_token = Some(token);
        }
        self
    }

    /// Check URLs and credentials
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url)
            .map_err(|e| Error::invalid_value("base_url", e.to_string()))?;
        url::Url::parse(&self.image_base_url)
            .map_err(|e| Error::invalid_value("image_base_url", e.to_string()))?;

        if self.auth_config().is_none() {
            return Err(Error::missing_field(format!(
                "api_key (or set {API_KEY_ENV} / {ACCESS_TOKEN_ENV})"
            )));
        }
        Ok(())
    }

    /// Credential to attach to requests
    pub fn auth_config(&self) -> AuthConfig {
        if let Some(token) = non_empty(self.access_token.as_deref()) {
            AuthConfig::bearer(token)
        } else if let Some(key) = non_empty(self.api_key.as_deref()) {
            AuthConfig::api_key_query(key)
        } else {
            AuthConfig::None
        }
    }

    /// HTTP client configuration derived from these settings
    pub fn http_client_config(&self) -> HttpClientConfig {
        HttpClientConfig::builder()
            .base_url(self.base_url.clone())
            .timeout(Duration::from_secs(self.http.timeout_secs))
            .max_retries(self.http.max_retries)
            .rate_limit(RateLimiterConfig::new(
                self.http.requests_per_second,
                self.http.burst_size,
            ))
            .build()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
