mod common;
pub use self::common::{Query, QueryCommon};
mod listing;
pub use self::listing::{ListingQuery, ListingSortBy};
