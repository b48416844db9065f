//! Auth configuration types

use serde::{Deserialize, Serialize};

/// Location for API key placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// Place in HTTP header
    Header,
    /// Place in query parameter
    #[default]
    Query,
}

/// Authentication configuration
#[derive(Debug, Clone, Default)]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// API Key authentication (header or query)
    ApiKey {
        /// Where to place the API key
        location: Location,
        /// Header name (for header location)
        header_name: Option<String>,
        /// Query parameter name (for query location)
        query_param: Option<String>,
        /// Prefix to add before the value (e.g., "Bearer ")
        prefix: Option<String>,
        /// The API key value
        value: String,
    },

    /// Bearer token authentication (TMDB v4 read access token)
    Bearer {
        /// The bearer token
        token: String,
    },
}

impl AuthConfig {
    /// TMDB v3 style: `?api_key=<key>`
    pub fn api_key_query(value: impl Into<String>) -> Self {
        Self::ApiKey {
            location: Location::Query,
            header_name: None,
            query_param: Some("api_key".to_string()),
            prefix: None,
            value: value.into(),
        }
    }

    /// Bearer token authentication
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Whether any credential is configured
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}
