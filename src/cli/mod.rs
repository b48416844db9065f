//! CLI module
//!
//! Command-line interface for browsing TMDB movie lists.
//!
//! # Commands
//!
//! - `now-playing` - Movies now in theatres
//! - `popular` - Popular movies
//! - `browse` - Both lists, loaded concurrently
//! - `search` - Search movies by title
//! - `details` - Show a single movie

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{render_details, render_movie, Runner};
