//! Caching wrapper around any listing source.

use async_trait::async_trait;
use auction_api::types::{Listing, ListingPage};
use auction_api::{ListingQuery, Query};

use crate::cache::MemoryCache;
use crate::error::AuctionError;
use crate::source::ItemSource;

const FEATURED_KEY: &str = "featured";
const LISTINGS_PREFIX: &str = "listings:";

/// Source wrapper that serves repeated requests from an in-memory cache.
///
/// Cache hits skip the inner source (and its latency) entirely. Keys are the
/// query's address string, so two queries that serialize identically share an
/// entry. Failures are never cached.
pub struct CachedClient<S> {
    inner: S,
    cache: MemoryCache,
}

impl<S: ItemSource> CachedClient<S> {
    pub fn new(inner: S, cache: MemoryCache) -> Self {
        Self { inner, cache }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

fn listings_key(query: &ListingQuery) -> String {
    format!("{}{}", LISTINGS_PREFIX, query.to_query_string())
}

#[async_trait]
impl<S: ItemSource> ItemSource for CachedClient<S> {
    async fn fetch_featured(&self) -> Result<Vec<Listing>, AuctionError> {
        if let Some(cached) = self.cache.get(FEATURED_KEY) {
            let listings: Vec<Listing> = serde_json::from_str(&cached)?;
            return Ok(listings);
        }

        let listings = self.inner.fetch_featured().await?;
        if let Ok(json) = serde_json::to_string(&listings) {
            self.cache.set(FEATURED_KEY.to_string(), json);
        }
        Ok(listings)
    }

    async fn fetch_page(&self, query: &ListingQuery) -> Result<ListingPage, AuctionError> {
        let cache_key = listings_key(query);

        if let Some(cached) = self.cache.get(&cache_key) {
            tracing::debug!("Cache hit for {}", cache_key);
            let page: ListingPage = serde_json::from_str(&cached)?;
            return Ok(page);
        }

        let page = self.inner.fetch_page(query).await?;
        if let Ok(json) = serde_json::to_string(&page) {
            self.cache.set(cache_key, json);
        }
        Ok(page)
    }
}
