//! Authentication module
//!
//! Supports: API Key (query or header) and Bearer tokens, the two
//! credential styles accepted by the TMDB API.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, Location};
