//! TMDB endpoints

use crate::http::RequestConfig;
use crate::types::ListKind;

/// A TMDB API call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `GET /movie/now_playing`
    NowPlaying { page: u32 },
    /// `GET /movie/popular`
    Popular { page: u32 },
    /// `GET /search/movie`
    Search { query: String, page: u32 },
    /// `GET /movie/{id}`
    MovieDetails { id: u64 },
}

impl Endpoint {
    /// Endpoint serving `page` of a list kind
    pub fn for_list(kind: &ListKind, page: u32) -> Self {
        match kind {
            ListKind::NowPlaying => Self::NowPlaying { page },
            ListKind::Popular => Self::Popular { page },
            ListKind::Search(query) => Self::Search {
                query: query.clone(),
                page,
            },
        }
    }

    /// Path relative to the API base URL
    pub fn path(&self) -> String {
        match self {
            Self::NowPlaying { .. } => "/movie/now_playing".to_string(),
            Self::Popular { .. } => "/movie/popular".to_string(),
            Self::Search { .. } => "/search/movie".to_string(),
            Self::MovieDetails { id } => format!("/movie/{id}"),
        }
    }

    /// Query parameters for this call
    pub fn request_config(&self) -> RequestConfig {
        match self {
            Self::NowPlaying { page } | Self::Popular { page } => {
                RequestConfig::new().query("page", page.to_string())
            }
            Self::Search { query, page } => RequestConfig::new()
                .query("page", page.to_string())
                .query("query", query.as_str()),
            Self::MovieDetails { .. } => RequestConfig::new(),
        }
    }
}
