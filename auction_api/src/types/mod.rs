mod listing;
pub use self::listing::{Listing, ListingID};

mod page;
pub use self::page::ListingPage;

mod category;
pub use self::category::Category;
