use serde::{Deserialize, Serialize};

use super::Listing;

/// One page of query results.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    /// The page-sized slice of matching listings, in sort order.
    pub listings: Vec<Listing>,
    /// More matching listings exist beyond this page.
    pub has_more: bool,
    /// Number of listings matching the filters, before pagination.
    pub total_count: usize,
}
