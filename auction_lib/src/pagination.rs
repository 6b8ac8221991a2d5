//! Incremental (infinite-scroll) pagination over an [`ItemSource`].
//!
//! The controller owns the accumulated listings and the loading flags. Filter
//! changes and page fetches are not serialized against each other: every
//! request carries the generation that was current when it started, and its
//! response is applied only if that generation is still current when it
//! resolves. A filter change bumps the generation, so any response still in
//! flight from older filters is discarded rather than aborted.

use std::sync::{Mutex, MutexGuard};

use auction_api::types::Listing;
use auction_api::{ListingQuery, ListingSortBy, Query};
use tokio::sync::watch;

use crate::error::AuctionError;
use crate::source::ItemSource;

/// Read-only projection of the pagination state for a rendering layer.
#[derive(Clone, Debug, PartialEq)]
pub struct PaginationSnapshot {
    /// Every listing loaded for the current filters, in result order.
    pub listings: Vec<Listing>,
    /// The first page for the current filters is in flight.
    pub loading: bool,
    /// A follow-up page is in flight.
    pub loading_more: bool,
    /// More pages exist beyond the last one loaded.
    pub has_more: bool,
    /// Listings matching the current filters, across all pages.
    pub total_count: usize,
    /// The last page that was appended.
    pub page: u32,
    /// Current search, category and sort. Always points at page 1.
    pub filters: ListingQuery,
}

impl PaginationSnapshot {
    fn initial() -> Self {
        Self {
            listings: Vec::new(),
            loading: true,
            loading_more: false,
            has_more: false,
            total_count: 0,
            page: 1,
            filters: ListingQuery::default(),
        }
    }

    /// Nothing is loading and nothing matched.
    pub fn is_empty(&self) -> bool {
        !self.loading && self.listings.is_empty()
    }

    /// Every matching listing has been loaded.
    pub fn is_exhausted(&self) -> bool {
        !self.loading && !self.has_more && !self.listings.is_empty()
    }
}

/// What happened to a load request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response was committed to the state.
    Applied,
    /// The filters changed while the request was in flight; the response was
    /// dropped.
    Stale,
    /// The guard refused the request (already loading, or nothing more to load).
    Skipped,
}

struct State {
    snapshot: PaginationSnapshot,
    generation: u64,
}

/// Stateful coordinator for the listings browse page.
///
/// All methods take `&self` so that filter changes and load-more requests can
/// interleave on one task (e.g. under `tokio::join!`) or across tasks through
/// an `Arc`. The state lock is never held across a fetch.
pub struct PaginationController<S> {
    source: S,
    state: Mutex<State>,
    publisher: watch::Sender<PaginationSnapshot>,
}

impl<S: ItemSource> PaginationController<S> {
    pub fn new(source: S) -> Self {
        let snapshot = PaginationSnapshot::initial();
        let (publisher, _) = watch::channel(snapshot.clone());
        Self {
            source,
            state: Mutex::new(State {
                snapshot,
                generation: 0,
            }),
            publisher,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self, state: &State) {
        self.publisher.send_replace(state.snapshot.clone());
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> PaginationSnapshot {
        self.lock().snapshot.clone()
    }

    /// Receives a fresh snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<PaginationSnapshot> {
        self.publisher.subscribe()
    }

    pub fn filters(&self) -> ListingQuery {
        self.lock().snapshot.filters.clone()
    }

    /// The current filters in address (query string) form.
    pub fn address(&self) -> String {
        self.filters().to_query_string()
    }

    /// Number of filter changes so far.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Replaces the filters and reloads from page 1.
    ///
    /// Accumulated listings are cleared immediately. The page number carried
    /// by `filters` is ignored.
    pub async fn set_filters(&self, filters: ListingQuery) -> Result<LoadOutcome, AuctionError> {
        let filters = filters.for_page(1);
        let generation = {
            let mut state = self.lock();
            state.generation += 1;
            let snapshot = &mut state.snapshot;
            snapshot.filters = filters.clone();
            snapshot.listings.clear();
            snapshot.page = 1;
            snapshot.loading = true;
            snapshot.loading_more = false;
            snapshot.has_more = false;
            snapshot.total_count = 0;
            self.publish(&state);
            state.generation
        };

        let result = self.source.fetch_page(&filters).await;

        let mut state = self.lock();
        if state.generation != generation {
            tracing::debug!(
                "Discarding page 1 for generation {} (current is {})",
                generation,
                state.generation
            );
            return Ok(LoadOutcome::Stale);
        }
        state.snapshot.loading = false;
        match result {
            Ok(page) => {
                tracing::info!(
                    "Loaded {} of {} listings for '{}'",
                    page.listings.len(),
                    page.total_count,
                    filters.to_query_string()
                );
                state.snapshot.listings = page.listings;
                state.snapshot.has_more = page.has_more;
                state.snapshot.total_count = page.total_count;
                self.publish(&state);
                Ok(LoadOutcome::Applied)
            }
            Err(e) => {
                tracing::warn!("Failed to fetch listings: {}", e);
                self.publish(&state);
                Err(e)
            }
        }
    }

    /// Parses filters from an address and applies them.
    pub async fn set_address(&self, address: &str) -> Result<LoadOutcome, AuctionError> {
        self.set_filters(ListingQuery::from_query_string(address))
            .await
    }

    pub async fn set_search(&self, search: &str) -> Result<LoadOutcome, AuctionError> {
        let filters = self.filters().with_search(search);
        self.set_filters(filters).await
    }

    pub async fn set_category(&self, category: &str) -> Result<LoadOutcome, AuctionError> {
        let filters = self.filters().with_category(category);
        self.set_filters(filters).await
    }

    pub async fn set_sort_by(&self, sort_by: ListingSortBy) -> Result<LoadOutcome, AuctionError> {
        let filters = self.filters().with_sort_by(sort_by);
        self.set_filters(filters).await
    }

    /// Fetches the next page and appends it.
    ///
    /// A no-op while any load is in flight or when there is nothing more to
    /// load, so at most one follow-up page is ever outstanding.
    pub async fn load_more(&self) -> Result<LoadOutcome, AuctionError> {
        let (generation, query) = {
            let mut state = self.lock();
            let snapshot = &state.snapshot;
            if snapshot.loading || snapshot.loading_more || !snapshot.has_more {
                tracing::debug!(
                    "Ignoring load-more (loading={}, loading_more={}, has_more={})",
                    snapshot.loading,
                    snapshot.loading_more,
                    snapshot.has_more
                );
                return Ok(LoadOutcome::Skipped);
            }
            let query = snapshot.filters.for_page(snapshot.page.saturating_add(1));
            state.snapshot.loading_more = true;
            self.publish(&state);
            (state.generation, query)
        };

        let result = self.source.fetch_page(&query).await;

        let mut state = self.lock();
        if state.generation != generation {
            tracing::debug!(
                "Discarding page {} for generation {} (current is {})",
                query.common.page,
                generation,
                state.generation
            );
            return Ok(LoadOutcome::Stale);
        }
        state.snapshot.loading_more = false;
        match result {
            Ok(page) => {
                tracing::info!(
                    "Appended page {} ({} listings)",
                    query.common.page,
                    page.listings.len()
                );
                state.snapshot.listings.extend(page.listings);
                state.snapshot.has_more = page.has_more;
                state.snapshot.total_count = page.total_count;
                state.snapshot.page = query.common.page;
                self.publish(&state);
                Ok(LoadOutcome::Applied)
            }
            Err(e) => {
                tracing::warn!("Failed to load more listings: {}", e);
                self.publish(&state);
                Err(e)
            }
        }
    }
}
