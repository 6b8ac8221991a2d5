//! The data seam the pagination controller depends on.

use async_trait::async_trait;
use auction_api::types::{Listing, ListingPage};
use auction_api::{Client, ListingQuery};

use crate::error::AuctionError;

/// Asynchronous provider of listing data.
///
/// These two calls are the only entry points the controller needs. Both may
/// suspend (network latency) and both may fail.
#[async_trait]
pub trait ItemSource: Send + Sync {
    /// A small, fixed number of listings sorted by end time ascending.
    async fn fetch_featured(&self) -> Result<Vec<Listing>, AuctionError>;

    /// One page of listings for the given filters and page number.
    async fn fetch_page(&self, query: &ListingQuery) -> Result<ListingPage, AuctionError>;
}

#[async_trait]
impl ItemSource for Client {
    async fn fetch_featured(&self) -> Result<Vec<Listing>, AuctionError> {
        Ok(Client::fetch_featured(self).await?)
    }

    async fn fetch_page(&self, query: &ListingQuery) -> Result<ListingPage, AuctionError> {
        Ok(self.fetch_listings(query).await?)
    }
}

#[async_trait]
impl<S: ItemSource + ?Sized> ItemSource for std::sync::Arc<S> {
    async fn fetch_featured(&self) -> Result<Vec<Listing>, AuctionError> {
        (**self).fetch_featured().await
    }

    async fn fetch_page(&self, query: &ListingQuery) -> Result<ListingPage, AuctionError> {
        (**self).fetch_page(query).await
    }
}

#[async_trait]
impl<S: ItemSource + ?Sized> ItemSource for &S {
    async fn fetch_featured(&self) -> Result<Vec<Listing>, AuctionError> {
        (**self).fetch_featured().await
    }

    async fn fetch_page(&self, query: &ListingQuery) -> Result<ListingPage, AuctionError> {
        (**self).fetch_page(query).await
    }
}
