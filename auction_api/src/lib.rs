mod client;
pub mod engine;
mod errors;
mod fixtures;
pub use self::fixtures::CATEGORY_NAMES;
mod query;
pub mod types;
pub use self::client::{Client, DEFAULT_FEATURED_COUNT, DEFAULT_PAGE_SIZE};
pub use self::errors::Error;
pub use self::query::{ListingQuery, ListingSortBy, Query, QueryCommon};
