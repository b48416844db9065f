//! TMDB movie service
//!
//! Thin typed layer over the HTTP client. One method per endpoint, each
//! performing exactly one request.

use super::endpoint::Endpoint;
use super::models::{Movie, MovieResponse};
use crate::config::AppConfig;
use crate::details::DetailFetcher;
use crate::error::Result;
use crate::http::HttpClient;
use crate::pagination::{FetchOutcome, PageBatch, PageFetcher};
use crate::types::ListKind;
use async_trait::async_trait;
use tracing::{debug, error, warn};

/// Client for the TMDB movie endpoints
#[derive(Debug)]
pub struct MovieService {
    client: HttpClient,
    image_base_url: String,
}

impl MovieService {
    /// Build a service from validated application config
    pub fn new(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let client = HttpClient::with_auth(config.http_client_config(), config.auth_config())?;
        Ok(Self::with_client(client, config.image_base_url.clone()))
    }

    /// Build a service around an existing client
    pub fn with_client(client: HttpClient, image_base_url: impl Into<String>) -> Self {
        Self {
            client,
            image_base_url: image_base_url.into(),
        }
    }

    /// Base URL for poster and backdrop images
    pub fn image_base_url(&self) -> &str {
        &self.image_base_url
    }

    /// Movies now in theatres
    pub async fn now_playing(&self, page: u32) -> Result<MovieResponse> {
        self.fetch_list(Endpoint::NowPlaying { page }).await
    }

    /// Movies ordered by popularity
    pub async fn popular(&self, page: u32) -> Result<MovieResponse> {
        self.fetch_list(Endpoint::Popular { page }).await
    }

    /// Search movies by title
    pub async fn search(&self, query: &str, page: u32) -> Result<MovieResponse> {
        self.fetch_list(Endpoint::Search {
            query: query.to_string(),
            page,
        })
        .await
    }

    /// Full record of a single movie
    pub async fn movie_details(&self, id: u64) -> Result<Movie> {
        let endpoint = Endpoint::MovieDetails { id };
        debug!(id, "Fetching movie details");

        match self
            .client
            .get_json::<Movie>(&endpoint.path(), endpoint.request_config())
            .await
        {
            Ok(movie) => {
                debug!(id, title = %movie.title, "Fetched movie details");
                Ok(movie)
            }
            Err(e) => {
                error!(id, error = %e, "Failed to fetch movie details");
                Err(e)
            }
        }
    }

    async fn fetch_list(&self, endpoint: Endpoint) -> Result<MovieResponse> {
        let path = endpoint.path();
        debug!(endpoint = ?endpoint, "Fetching movies");

        match self
            .client
            .get_json::<MovieResponse>(&path, endpoint.request_config())
            .await
        {
            Ok(response) => {
                debug!(
                    path = %path,
                    count = response.results.len(),
                    page = ?response.page,
                    total_pages = ?response.total_pages,
                    "Fetched movies"
                );
                if response.results.is_empty() {
                    warn!(path = %path, "Movie list response is empty");
                }
                Ok(response)
            }
            Err(e) => {
                error!(path = %path, error = %e, "Failed to fetch movies");
                Err(e)
            }
        }
    }
}

#[async_trait]
impl PageFetcher for MovieService {
    type Item = Movie;

    async fn fetch_page(&self, kind: &ListKind, page: u32) -> FetchOutcome<Movie> {
        self.fetch_list(Endpoint::for_list(kind, page))
            .await
            .map(PageBatch::from)
    }
}

#[async_trait]
impl DetailFetcher for MovieService {
    type Detail = Movie;

    async fn fetch_detail(&self, id: u64) -> Result<Movie> {
        self.movie_details(id).await
    }
}
