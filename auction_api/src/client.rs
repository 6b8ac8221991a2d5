//! Mock listings backend with simulated network latency.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;

use crate::{
    engine,
    fixtures::{mock_categories, mock_listings},
    query::ListingQuery,
    types::{Category, Listing, ListingPage},
    Error,
};

/// Default number of listings per page.
pub const DEFAULT_PAGE_SIZE: usize = 8;
/// Default number of listings on the home page preview.
pub const DEFAULT_FEATURED_COUNT: usize = 8;

const DEFAULT_LISTINGS_LATENCY: Duration = Duration::from_millis(300);
const DEFAULT_FEATURED_LATENCY: Duration = Duration::from_millis(200);

/// In-memory listings backend.
///
/// Serves a read-only listing collection through the query pipeline after a
/// simulated network delay. The collection is shared behind an `Arc` and is
/// never mutated, so concurrent fetches need no locking. A non-zero failure
/// rate makes fetches fail at random with [`Error::RequestFailed`].
#[derive(Clone)]
pub struct Client {
    listings: Arc<[Listing]>,
    categories: Arc<[Category]>,
    page_size: NonZeroUsize,
    featured_count: usize,
    listings_latency: Duration,
    featured_latency: Duration,
    failure_rate: f64,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a client over the built-in mock catalogue, with end times
    /// relative to now.
    pub fn new() -> Self {
        Self::from_parts(mock_listings(Utc::now()))
    }

    /// Creates a client over a custom listing collection. Fails if any
    /// listing's current bid is below its starting price.
    pub fn with_listings(listings: Vec<Listing>) -> Result<Self, Error> {
        if let Some(bad) = listings.iter().find(|listing| !listing.is_consistent()) {
            tracing::error!("Rejecting listing {}: bid below starting price", bad.id);
            return Err(Error::InvalidListing {
                id: bad.id.clone(),
                reason: "current bid is below the starting price".to_string(),
            });
        }
        Ok(Self::from_parts(listings))
    }

    fn from_parts(listings: Vec<Listing>) -> Self {
        Self {
            listings: listings.into(),
            categories: mock_categories().into(),
            page_size: NonZeroUsize::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroUsize::MIN),
            featured_count: DEFAULT_FEATURED_COUNT,
            listings_latency: DEFAULT_LISTINGS_LATENCY,
            featured_latency: DEFAULT_FEATURED_LATENCY,
            failure_rate: 0.0,
        }
    }

    /// Sets the default page size. Zero keeps the current value.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        if let Some(page_size) = NonZeroUsize::new(page_size) {
            self.page_size = page_size;
        }
        self
    }

    pub fn with_featured_count(mut self, featured_count: usize) -> Self {
        self.featured_count = featured_count;
        self
    }

    /// Sets the simulated latency for listing pages and for the featured preview.
    pub fn with_latency(mut self, listings: Duration, featured: Duration) -> Self {
        self.listings_latency = listings;
        self.featured_latency = featured;
        self
    }

    /// Sets the probability (clamped to 0..=1) that a fetch fails.
    pub fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = if failure_rate.is_nan() {
            0.0
        } else {
            failure_rate.clamp(0.0, 1.0)
        };
        self
    }

    /// The full listing collection this client serves.
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    async fn simulate_network(&self, label: &str, latency: Duration) -> Result<(), Error> {
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        let failed = self.failure_rate > 0.0 && rand::thread_rng().gen_bool(self.failure_rate);
        if failed {
            tracing::error!("Simulated transport failure while fetching {}", label);
            return Err(Error::RequestFailed(format!("{} unavailable", label)));
        }
        Ok(())
    }

    /// Fetches the featured listings: the soonest-ending few.
    pub async fn fetch_featured(&self) -> Result<Vec<Listing>, Error> {
        self.simulate_network("featured listings", self.featured_latency)
            .await?;
        Ok(engine::featured(&self.listings, self.featured_count))
    }

    /// Fetches one page of listings matching the query. The query's page
    /// size overrides the client default when set and non-zero.
    pub async fn fetch_listings(&self, query: &ListingQuery) -> Result<ListingPage, Error> {
        self.simulate_network("listings", self.listings_latency)
            .await?;
        let page_size = query
            .common
            .page_size
            .and_then(NonZeroUsize::new)
            .unwrap_or(self.page_size);
        let page = engine::query(&self.listings, query, page_size);
        tracing::debug!(
            "Serving page {} ({} of {} matching listings)",
            query.common.page,
            page.listings.len(),
            page.total_count
        );
        Ok(page)
    }

    /// Fetches the category catalogue.
    pub async fn fetch_categories(&self) -> Result<Vec<Category>, Error> {
        self.simulate_network("categories", self.featured_latency)
            .await?;
        Ok(self.categories.to_vec())
    }
}
