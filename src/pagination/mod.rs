//! Pagination module
//!
//! Page-at-a-time loading for the movie lists.
//!
//! # Overview
//!
//! A [`PageFetcher`] turns a list kind and a 1-based page number into one
//! [`PageBatch`]. The [`PaginationController`] owns a [`ListState`] per
//! list, decides whether a fetch is admissible, and merges each batch into
//! the accumulated items: replace on initial load, append on load more.
//!
//! ```text
//!            load_initial ──► LoadingInitial ──┐
//!   Idle ◄───────────────────────────────────────┤
//!            load_more (has_more) ──► LoadingMore ┘
//! ```

mod controller;
mod fetcher;
mod types;

pub use controller::PaginationController;
pub use fetcher::PageFetcher;
pub use types::{
    FetchOutcome, ListEvent, ListState, LoadOutcome, LoadPhase, PageBatch, SearchState,
};

#[cfg(test)]
mod tests;
