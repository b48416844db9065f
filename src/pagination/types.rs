//! Pagination types
//!
//! Per-list state, fetch results, and the outcomes and events the
//! controller reports back to presenters.

use crate::error::{Error, Result};
use crate::types::ListId;
use std::sync::Arc;

/// One page of items returned by a [`PageFetcher`](super::PageFetcher)
#[derive(Debug, Clone, PartialEq)]
pub struct PageBatch<T> {
    /// Items on this page, in upstream order
    pub items: Vec<T>,
    /// Total page count, when the upstream reports it
    pub total_pages: Option<u32>,
}

impl<T> PageBatch<T> {
    /// Create a batch with a known page count
    pub fn new(items: Vec<T>, total_pages: u32) -> Self {
        Self {
            items,
            total_pages: Some(total_pages),
        }
    }

    /// Create a batch without page metadata
    pub fn without_total(items: Vec<T>) -> Self {
        Self {
            items,
            total_pages: None,
        }
    }

    /// Number of items on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the page is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Result of a single page fetch
pub type FetchOutcome<T> = Result<PageBatch<T>>;

/// Which fetch, if any, is in flight for a list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    /// Nothing in flight
    #[default]
    Idle,
    /// Fetching page 1 to replace the list
    LoadingInitial,
    /// Fetching the next page to append
    LoadingMore,
}

/// Pagination state for one list
///
/// `current_page` is the page the next `load_more` will request. It only
/// advances after a successful fetch that leaves `has_more` set.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    /// Accumulated items, replaced on initial load and appended on load more
    pub items: Vec<T>,
    /// 1-based page number for the next fetch
    pub current_page: u32,
    /// Total pages reported by the last successful fetch
    pub total_pages: Option<u32>,
    /// Whether more pages are believed to exist
    pub has_more: bool,
    /// In-flight fetch, if any
    pub phase: LoadPhase,
    /// Error from the most recent failed fetch
    pub last_error: Option<Arc<Error>>,
    /// Page to go back to if the in-flight initial load fails
    rewound_from: Option<u32>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            total_pages: None,
            has_more: true,
            phase: LoadPhase::Idle,
            last_error: None,
            rewound_from: None,
        }
    }
}

impl<T> ListState<T> {
    /// Create an empty list state (page 1, more pages assumed)
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial load in flight
    pub fn is_loading_initial(&self) -> bool {
        self.phase == LoadPhase::LoadingInitial
    }

    /// Load more in flight
    pub fn is_loading_more(&self) -> bool {
        self.phase == LoadPhase::LoadingMore
    }

    /// Any fetch in flight
    pub fn is_loading(&self) -> bool {
        self.phase != LoadPhase::Idle
    }

    /// Admission check for an initial load
    pub fn can_load_initial(&self) -> bool {
        !self.is_loading()
    }

    /// Admission check for a load more
    pub fn can_load_more(&self) -> bool {
        self.has_more && !self.is_loading()
    }

    /// Whether `index` is the last rendered item
    pub fn is_trailing_index(&self, index: usize) -> bool {
        !self.items.is_empty() && index == self.items.len() - 1
    }

    /// Enter `LoadingInitial` and rewind to page 1
    ///
    /// The previous page is kept so a failed reload can restore it.
    pub(crate) fn begin_initial(&mut self) {
        self.phase = LoadPhase::LoadingInitial;
        self.rewound_from = Some(self.current_page);
        self.current_page = 1;
    }

    /// Enter `LoadingMore`
    pub(crate) fn begin_more(&mut self) {
        self.phase = LoadPhase::LoadingMore;
    }

    /// Merge a fetched page and return to `Idle`
    ///
    /// Replaces the items after an initial load, appends after a load more.
    /// Without page metadata, an empty page ends pagination. Returns the
    /// number of items fetched.
    pub(crate) fn apply_success(&mut self, batch: PageBatch<T>) -> usize {
        let fetched = batch.items.len();
        let exhausted = batch.is_empty();

        if self.phase == LoadPhase::LoadingMore {
            self.items.extend(batch.items);
        } else {
            self.items = batch.items;
        }

        self.has_more = match batch.total_pages {
            Some(total) => self.current_page < total,
            None => !exhausted,
        };
        if self.has_more {
            self.current_page += 1;
        }

        self.total_pages = batch.total_pages;
        self.last_error = None;
        self.rewound_from = None;
        self.phase = LoadPhase::Idle;
        fetched
    }

    /// Record a failed fetch and return to `Idle`
    ///
    /// Items, page and `has_more` end up as they were before the call: a
    /// failed reload restores the page it rewound from, and the next
    /// `load_more` retries the same page.
    pub(crate) fn apply_failure(&mut self, error: Error) {
        if let Some(page) = self.rewound_from.take() {
            self.current_page = page;
        }
        self.last_error = Some(Arc::new(error));
        self.phase = LoadPhase::Idle;
    }
}

/// Search results, kept apart from the paged lists
#[derive(Debug, Clone)]
pub struct SearchState<T> {
    /// Query of the most recent search call
    pub query: String,
    /// Results of the most recent applied search
    pub results: Vec<T>,
    /// Number of searches in flight when the snapshot was taken
    pub in_flight: usize,
    /// Error from the most recent failed search
    pub last_error: Option<Arc<Error>>,
    /// Bumped on every search call; completions from older calls are dropped
    pub generation: u64,
}

impl<T> Default for SearchState<T> {
    fn default() -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            in_flight: 0,
            last_error: None,
            generation: 0,
        }
    }
}

impl<T> SearchState<T> {
    /// Any search in flight
    pub fn is_searching(&self) -> bool {
        self.in_flight > 0
    }
}

/// What a load or search call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Not admitted; nothing changed
    Skipped,
    /// Results emptied without fetching
    Cleared,
    /// Fetch succeeded and was merged
    Loaded {
        /// Items on the fetched page
        fetched: usize,
    },
    /// Fetch failed; the error is in the state snapshot
    Failed,
    /// Fetch finished after a newer call and was discarded
    Superseded,
}

impl LoadOutcome {
    /// Check if a fetch was issued and merged
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }

    /// Check if the call was a no-op
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}

/// Notification sent to presenters after a state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEvent {
    /// A fetch was admitted for the list
    Started(ListId, LoadPhase),
    /// A page was merged into the list
    Updated(ListId),
    /// A fetch for the list failed
    Failed(ListId),
    /// Search results were replaced or cleared
    SearchUpdated,
    /// A search failed
    SearchFailed,
}
