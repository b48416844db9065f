//! Page fetcher trait

use super::types::FetchOutcome;
use crate::types::ListKind;
use async_trait::async_trait;
use std::sync::Arc;

/// Source of pages for the pagination controller
///
/// Implementations perform exactly one upstream call per invocation and
/// never retry on their own behalf.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Item type; opaque to the controller
    type Item: Clone + Send + Sync + 'static;

    /// Fetch the 1-based `page` of `kind`
    async fn fetch_page(&self, kind: &ListKind, page: u32) -> FetchOutcome<Self::Item>;
}

#[async_trait]
impl<F: PageFetcher + ?Sized> PageFetcher for Arc<F> {
    type Item = F::Item;

    async fn fetch_page(&self, kind: &ListKind, page: u32) -> FetchOutcome<Self::Item> {
        (**self).fetch_page(kind, page).await
    }
}
