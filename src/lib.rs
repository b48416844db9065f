// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # TMDB Browse
//!
//! Paginated browsing of TMDB movie lists: now playing, popular, and title
//! search, plus a single-movie detail view.
//!
//! ## Features
//!
//! - **Page-at-a-time loading**: Initial load replaces, load more appends
//! - **Single flight**: At most one load in flight per list
//! - **Typed errors**: Network, decode, and upstream failures stay distinct
//! - **Rate limiting**: Client-side token bucket in front of the API
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tmdb_browse::{AppConfig, ListId, MovieService, PaginationController, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::default().with_env_overrides();
//!     let service = Arc::new(MovieService::new(&config)?);
//!     let controller = PaginationController::new(service);
//!
//!     controller.load_initial(ListId::Popular).await;
//!     controller.load_more(ListId::Popular).await;
//!
//!     for movie in controller.snapshot(ListId::Popular).await.items {
//!         println!("{} ({})", movie.title, movie.formatted_rating());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       CLI presenter                          │
//! │  load_initial / load_more_if_trailing / search → snapshot    │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//! ┌──────────────────────┬──────┴───────────┬───────────────────┐
//! │ PaginationController │  DetailLoader    │  ListEvent stream │
//! └──────────────────────┴──────┬───────────┴───────────────────┘
//!                               │ PageFetcher / DetailFetcher
//! ┌──────────┬──────────────────┴─────┬───────────────────────────┐
//! │   Auth   │   HTTP                 │   TMDB                    │
//! ├──────────┼────────────────────────┼───────────────────────────┤
//! │ API Key  │ GET, Retry, Rate Limit │ Endpoints, Movie models   │
//! │ Bearer   │ Backoff                │ MovieService              │
//! └──────────┴────────────────────────┴───────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication implementations
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Paginated list loading
pub mod pagination;

/// Single-item detail loading
pub mod details;

/// TMDB endpoints, models, and service
pub mod tmdb;

/// Application configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, ErrorKind, Result};
pub use types::*;

// Re-export commonly used types
pub use config::AppConfig;
pub use details::{DetailFetcher, DetailLoader, DetailState};
pub use pagination::{
    ListEvent, ListState, LoadOutcome, LoadPhase, PageBatch, PageFetcher, PaginationController,
    SearchState,
};
pub use tmdb::{Movie, MovieResponse, MovieService};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
