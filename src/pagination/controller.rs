//! Pagination controller
//!
//! Mediates every paged fetch for the now-playing and popular lists and
//! owns the separate search result set.
//!
//! All state sits behind async locks that are never held across a fetch.
//! Admission and the phase change happen in one critical section, so at
//! most one fetch is in flight per list no matter how many tasks trigger
//! loads. Redundant triggers are dropped, not queued.
//!
//! There is no cancellation: an admitted `load_*` future must be driven to
//! completion, otherwise the list stays in its loading phase.

use super::fetcher::PageFetcher;
use super::types::{ListEvent, ListState, LoadOutcome, LoadPhase, SearchState};
use crate::types::{ListId, ListKind};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, error, warn};

/// Default capacity of the presenter event channel
const EVENT_CAPACITY: usize = 64;

/// Pagination controller for a set of paged lists plus search
pub struct PaginationController<F: PageFetcher> {
    fetcher: F,
    lists: RwLock<HashMap<ListId, ListState<F::Item>>>,
    search: RwLock<SearchState<F::Item>>,
    searches_in_flight: AtomicUsize,
    events: broadcast::Sender<ListEvent>,
}

/// Counts one in-flight search; released on drop, including when the
/// search future is dropped mid-fetch
struct SearchInFlight<'a>(&'a AtomicUsize);

impl<'a> SearchInFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for SearchInFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<F: PageFetcher> PaginationController<F> {
    /// Create a controller with empty state for every list
    pub fn new(fetcher: F) -> Self {
        let lists = ListId::ALL
            .into_iter()
            .map(|list| (list, ListState::new()))
            .collect();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            fetcher,
            lists: RwLock::new(lists),
            search: RwLock::new(SearchState::default()),
            searches_in_flight: AtomicUsize::new(0),
            events,
        }
    }

    /// The page fetcher
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Subscribe to state transition notifications
    pub fn subscribe(&self) -> broadcast::Receiver<ListEvent> {
        self.events.subscribe()
    }

    /// Copy of the current state of `list`
    pub async fn snapshot(&self, list: ListId) -> ListState<F::Item> {
        self.lists
            .read()
            .await
            .get(&list)
            .cloned()
            .unwrap_or_default()
    }

    /// Copy of the current search state
    pub async fn search_snapshot(&self) -> SearchState<F::Item> {
        let mut snapshot = self.search.read().await.clone();
        snapshot.in_flight = self.searches_in_flight.load(Ordering::SeqCst);
        snapshot
    }

    /// Load page 1 of `list`, replacing its items
    ///
    /// Skipped while any fetch for the list is in flight.
    pub async fn load_initial(&self, list: ListId) -> LoadOutcome {
        let page = {
            let mut lists = self.lists.write().await;
            let state = lists.entry(list).or_default();
            if !state.can_load_initial() {
                debug!(list = %list, phase = ?state.phase, "Skipping initial load");
                return LoadOutcome::Skipped;
            }
            state.begin_initial();
            state.current_page
        };

        self.notify(ListEvent::Started(list, LoadPhase::LoadingInitial));
        self.fetch_and_merge(list, page).await
    }

    /// Load the next page of `list`, appending its items
    ///
    /// Skipped when no more pages exist or a fetch is in flight.
    pub async fn load_more(&self, list: ListId) -> LoadOutcome {
        let page = {
            let mut lists = self.lists.write().await;
            let state = lists.entry(list).or_default();
            if !state.can_load_more() {
                debug!(
                    list = %list,
                    phase = ?state.phase,
                    has_more = state.has_more,
                    "Skipping load more"
                );
                return LoadOutcome::Skipped;
            }
            state.begin_more();
            state.current_page
        };

        self.notify(ListEvent::Started(list, LoadPhase::LoadingMore));
        self.fetch_and_merge(list, page).await
    }

    /// Load more when `index` is the last item of `list`
    ///
    /// Presenters call this for every item they display.
    pub async fn load_more_if_trailing(&self, list: ListId, index: usize) -> LoadOutcome {
        let trailing = self
            .lists
            .read()
            .await
            .get(&list)
            .is_some_and(|state| state.is_trailing_index(index));

        if trailing {
            self.load_more(list).await
        } else {
            LoadOutcome::Skipped
        }
    }

    /// Search by title
    ///
    /// An empty query clears the results without fetching. Any other query
    /// fetches page 1 and replaces the results. Searches are not guarded
    /// against each other; a completion that arrives after a newer search
    /// call is discarded.
    pub async fn search(&self, query: &str) -> LoadOutcome {
        let (generation, in_flight) = {
            let mut search = self.search.write().await;
            search.generation += 1;
            search.query = query.to_string();

            if query.is_empty() {
                search.results.clear();
                search.last_error = None;
                drop(search);
                self.notify(ListEvent::SearchUpdated);
                return LoadOutcome::Cleared;
            }

            (search.generation, SearchInFlight::enter(&self.searches_in_flight))
        };

        debug!(query = %query, "Searching");
        let outcome = self
            .fetcher
            .fetch_page(&ListKind::Search(query.to_string()), 1)
            .await;

        let mut search = self.search.write().await;
        drop(in_flight);
        if search.generation != generation {
            debug!(query = %query, "Discarding superseded search results");
            return LoadOutcome::Superseded;
        }

        match outcome {
            Ok(batch) => {
                let fetched = batch.len();
                search.results = batch.items;
                search.last_error = None;
                drop(search);
                debug!(query = %query, fetched, "Search complete");
                self.notify(ListEvent::SearchUpdated);
                LoadOutcome::Loaded { fetched }
            }
            Err(e) => {
                error!(query = %query, error = %e, "Failed to search movies");
                search.last_error = Some(e.into());
                drop(search);
                self.notify(ListEvent::SearchFailed);
                LoadOutcome::Failed
            }
        }
    }

    /// Fetch `page` of an admitted list and merge the result
    async fn fetch_and_merge(&self, list: ListId, page: u32) -> LoadOutcome {
        debug!(list = %list, page, "Fetching page");
        let outcome = self.fetcher.fetch_page(&list.kind(), page).await;

        let (result, event) = {
            let mut lists = self.lists.write().await;
            let state = lists.entry(list).or_default();
            match outcome {
                Ok(batch) => {
                    if batch.is_empty() {
                        warn!(list = %list, page, "Fetched an empty page");
                    }
                    let fetched = state.apply_success(batch);
                    debug!(
                        list = %list,
                        page,
                        fetched,
                        total = state.items.len(),
                        has_more = state.has_more,
                        "Merged page"
                    );
                    (LoadOutcome::Loaded { fetched }, ListEvent::Updated(list))
                }
                Err(e) => {
                    error!(list = %list, page, error = %e, "Failed to fetch page");
                    state.apply_failure(e);
                    (LoadOutcome::Failed, ListEvent::Failed(list))
                }
            }
        };

        self.notify(event);
        result
    }

    /// Send an event; having no subscribers is fine
    fn notify(&self, event: ListEvent) {
        let _ = self.events.send(event);
    }
}

impl<F: PageFetcher> std::fmt::Debug for PaginationController<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationController")
            .field("subscribers", &self.events.receiver_count())
            .finish_non_exhaustive()
    }
}
