//! HTTP client module
//!
//! Provides the HTTP client used to talk to the TMDB API.
//!
//! # Features
//!
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Optional Retries**: Off by default; constant, linear, or exponential backoff
//! - **Authentication**: Integration with auth module
//! - **Typed Decoding**: JSON bodies decoded with decode failures kept distinct

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
