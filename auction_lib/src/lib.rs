//! Library layer for the auction marketplace: the item source seam, the
//! incremental pagination controller, the load-more trigger channel, and
//! caching, validation, configuration and display helpers.
//!
//! Wraps the `auction_api` crate, which owns the data model and the pure
//! listings query pipeline.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod pagination;
pub mod scroll;
pub mod source;
pub mod validation;

pub use auction_api;
pub use auction_api::types;
pub use auction_api::{ListingQuery, ListingSortBy, Query};

pub use client::CachedClient;
pub use config::Config;
pub use error::AuctionError;
pub use pagination::{LoadOutcome, PaginationController, PaginationSnapshot};
pub use scroll::{drive_load_more, load_more_channel, ProximityTrigger, ViewportMetrics};
pub use source::ItemSource;
