//! TMDB response models
//!
//! Deserialized shapes of the movie list and movie detail responses, plus
//! the small formatting helpers the presenters need.

use crate::pagination::PageBatch;
use crate::types::ImageSize;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default base URL of the TMDB image CDN
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Shown when a movie has no rating
const RATING_UNAVAILABLE: &str = "N/A";

/// Shown when a release date is missing or malformed
const RELEASE_DATE_UNAVAILABLE: &str = "Release date unavailable";

/// A movie as returned by list, search, and detail endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// TMDB movie id
    pub id: u64,
    /// Localized title
    pub title: String,
    /// Plot summary
    #[serde(default)]
    pub overview: String,
    /// Poster image path, e.g. `/kqjL17yufvn9OVLyXYpvtyrFfak.jpg`
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Average rating, 0-10
    #[serde(default)]
    pub vote_average: Option<f64>,
    /// Release date as `yyyy-MM-dd`
    #[serde(default)]
    pub release_date: Option<String>,
    /// Backdrop image path
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// ISO 639-1 language code
    #[serde(default)]
    pub original_language: Option<String>,
    /// Number of votes
    #[serde(default)]
    pub vote_count: Option<u64>,
}

impl Movie {
    /// Poster URL at `w500`
    pub fn poster_url(&self, image_base_url: &str) -> Option<String> {
        image_url(image_base_url, self.poster_path.as_deref(), ImageSize::W500)
    }

    /// Backdrop URL at full resolution
    pub fn backdrop_url(&self, image_base_url: &str) -> Option<String> {
        image_url(
            image_base_url,
            self.backdrop_path.as_deref(),
            ImageSize::Original,
        )
    }

    /// Rating with one decimal place, or `N/A`
    pub fn formatted_rating(&self) -> String {
        match self.vote_average {
            Some(rating) => format!("{rating:.1}"),
            None => RATING_UNAVAILABLE.to_string(),
        }
    }

    /// Release date in medium style, e.g. `Jan 16, 2025`
    pub fn formatted_release_date(&self) -> String {
        format_release_date(self.release_date.as_deref())
    }
}

/// Build an image CDN URL; `None` when the movie has no image
pub fn image_url(image_base_url: &str, path: Option<&str>, size: ImageSize) -> Option<String> {
    let path = path.filter(|p| !p.is_empty())?;
    Some(format!(
        "{}/{}{}",
        image_base_url.trim_end_matches('/'),
        size.as_str(),
        path
    ))
}

/// Render a `yyyy-MM-dd` date for display
pub fn format_release_date(date: Option<&str>) -> String {
    date.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .map_or_else(
            || RELEASE_DATE_UNAVAILABLE.to_string(),
            |d| d.format("%b %-d, %Y").to_string(),
        )
}

/// Paged movie list response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieResponse {
    /// Page number of this response
    #[serde(default)]
    pub page: Option<u32>,
    /// Movies on this page
    pub results: Vec<Movie>,
    /// Total number of pages
    #[serde(default)]
    pub total_pages: Option<u32>,
    /// Total number of results
    #[serde(default)]
    pub total_results: Option<u64>,
    /// Release window (now playing only)
    #[serde(default)]
    pub dates: Option<MovieResponseDates>,
}

/// Release window of the now playing listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieResponseDates {
    /// Latest release date
    pub maximum: String,
    /// Earliest release date
    pub minimum: String,
}

impl From<MovieResponse> for PageBatch<Movie> {
    fn from(response: MovieResponse) -> Self {
        Self {
            items: response.results,
            total_pages: response.total_pages,
        }
    }
}
