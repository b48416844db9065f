//! Common types used throughout tmdb-browse
//!
//! This module contains shared type definitions used across multiple
//! modules: list identifiers, fetch kinds, and HTTP tuning enums.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Lists
// ============================================================================

/// Identifies one of the independently paginated lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListId {
    /// Movies currently in theatres
    NowPlaying,
    /// Movies ordered by popularity
    Popular,
}

impl ListId {
    /// Every paged list, in home-screen order
    pub const ALL: [ListId; 2] = [ListId::NowPlaying, ListId::Popular];

    /// The fetch kind backing this list
    pub fn kind(self) -> ListKind {
        match self {
            ListId::NowPlaying => ListKind::NowPlaying,
            ListId::Popular => ListKind::Popular,
        }
    }

    /// Human-readable name
    pub fn as_str(self) -> &'static str {
        match self {
            ListId::NowPlaying => "now_playing",
            ListId::Popular => "popular",
        }
    }
}

impl std::fmt::Display for ListId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a page fetch should retrieve
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListKind {
    /// Now playing listing
    NowPlaying,
    /// Popular listing
    Popular,
    /// Free-text title search
    Search(String),
}

impl std::fmt::Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListKind::NowPlaying => f.write_str("now_playing"),
            ListKind::Popular => f.write_str("popular"),
            ListKind::Search(query) => write!(f, "search({query})"),
        }
    }
}

// ============================================================================
// Images
// ============================================================================

/// Image renditions served by the TMDB image CDN
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    /// 200px wide
    W200,
    /// 500px wide
    #[default]
    W500,
    /// Full resolution
    Original,
}

impl ImageSize {
    /// Path segment used in image URLs
    pub fn as_str(self) -> &'static str {
        match self {
            ImageSize::W200 => "w200",
            ImageSize::W500 => "w500",
            ImageSize::Original => "original",
        }
    }
}

// ============================================================================
// Log Level
// ============================================================================

/// Log level for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Backoff strategy for HTTP retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}
