//! Listing types: the auctionable items shown on cards and in the browse grid.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier for a listing.
pub type ListingID = String;

/// An auctionable listing with price, timing, and engagement attributes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Unique, stable listing identifier.
    pub id: ListingID,

    pub title: String,

    /// Display image reference.
    pub image_url: String,

    /// Opening price in whole currency units.
    pub starting_price: u64,

    /// Highest bid so far. `None` means no bids have been placed.
    pub current_bid: Option<u64>,

    pub bid_count: u32,

    /// Absolute time at which the auction closes.
    pub end_time: DateTime<Utc>,

    /// Category label used for filtering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Bids placed in the last ten minutes. Only used for "hot" ranking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_bids: Option<u32>,
}

impl Listing {
    /// The price a buyer currently has to beat: the current bid if any,
    /// otherwise the starting price.
    pub fn effective_price(&self) -> u64 {
        self.current_bid.unwrap_or(self.starting_price)
    }

    /// A current bid, when present, is never below the starting price.
    pub fn is_consistent(&self) -> bool {
        self.current_bid
            .map_or(true, |bid| bid >= self.starting_price)
    }
}
