//! Single-item detail loading
//!
//! Backs the detail view: one item fetched by id, with its own loading
//! flag and error. A newer `load` supersedes any load still in flight.

use crate::error::{Error, Result};
use crate::pagination::LoadOutcome;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error};

/// Source of item details
#[async_trait]
pub trait DetailFetcher: Send + Sync {
    /// Detail type
    type Detail: Clone + Send + Sync + 'static;

    /// Fetch the item with the given id
    async fn fetch_detail(&self, id: u64) -> Result<Self::Detail>;
}

#[async_trait]
impl<F: DetailFetcher + ?Sized> DetailFetcher for Arc<F> {
    type Detail = F::Detail;

    async fn fetch_detail(&self, id: u64) -> Result<Self::Detail> {
        (**self).fetch_detail(id).await
    }
}

/// Detail view state
#[derive(Debug, Clone)]
pub struct DetailState<D> {
    /// Id of the most recent request
    pub requested_id: Option<u64>,
    /// Loaded item
    pub item: Option<D>,
    /// Whether a load is in flight
    pub is_loading: bool,
    /// Error from the most recent failed load
    pub last_error: Option<Arc<Error>>,
    generation: u64,
}

impl<D> Default for DetailState<D> {
    fn default() -> Self {
        Self {
            requested_id: None,
            item: None,
            is_loading: false,
            last_error: None,
            generation: 0,
        }
    }
}

/// Loads details for one item at a time
pub struct DetailLoader<F: DetailFetcher> {
    fetcher: F,
    state: RwLock<DetailState<F::Detail>>,
}

impl<F: DetailFetcher> DetailLoader<F> {
    /// Create a loader with empty state
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            state: RwLock::new(DetailState::default()),
        }
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> DetailState<F::Detail> {
        self.state.read().await.clone()
    }

    /// Load details for `id`
    pub async fn load(&self, id: u64) -> LoadOutcome {
        let generation = {
            let mut state = self.state.write().await;
            state.generation += 1;
            state.requested_id = Some(id);
            state.is_loading = true;
            state.last_error = None;
            state.generation
        };

        debug!(id, "Fetching details");
        let outcome = self.fetcher.fetch_detail(id).await;

        let mut state = self.state.write().await;
        if state.generation != generation {
            debug!(id, "Discarding superseded details");
            return LoadOutcome::Superseded;
        }
        state.is_loading = false;

        match outcome {
            Ok(item) => {
                state.item = Some(item);
                LoadOutcome::Loaded { fetched: 1 }
            }
            Err(e) => {
                error!(id, error = %e, "Failed to fetch details");
                state.last_error = Some(e.into());
                LoadOutcome::Failed
            }
        }
    }
}

impl<F: DetailFetcher> std::fmt::Debug for DetailLoader<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetailLoader").finish_non_exhaustive()
    }
}
