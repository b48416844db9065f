//! TMDB API module
//!
//! Endpoints, response models, and the [`MovieService`] that implements
//! both [`PageFetcher`](crate::pagination::PageFetcher) for the movie lists
//! and [`DetailFetcher`](crate::details::DetailFetcher) for the detail view.

mod endpoint;
mod models;
mod service;

pub use endpoint::Endpoint;
pub use models::{
    format_release_date, image_url, Movie, MovieResponse, MovieResponseDates,
    DEFAULT_IMAGE_BASE_URL,
};
pub use service::MovieService;
