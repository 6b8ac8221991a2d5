//! The listings query pipeline: text filter, category filter, stable sort, paginate.
//!
//! Every function here is pure over its inputs. The stage order is fixed;
//! later stages only ever see the output of earlier ones.

use std::cmp::Ordering;
use std::num::NonZeroUsize;

use crate::query::{ListingQuery, ListingSortBy};
use crate::types::{Listing, ListingPage};

/// Runs `params` against `items` and returns one page of results.
///
/// `total_count` is the size of the filtered set. Pages past the end are
/// empty with `has_more = false`. Page 0 is treated as page 1.
pub fn query(items: &[Listing], params: &ListingQuery, page_size: NonZeroUsize) -> ListingPage {
    let filtered: Vec<&Listing> = items
        .iter()
        .filter(|listing| matches_search(listing, params.search.as_deref()))
        .filter(|listing| matches_category(listing, params.category.as_deref()))
        .collect();
    let sorted = sort_listings(filtered, params.sort_by);
    paginate(&sorted, params.common.page, page_size)
}

/// The `count` soonest-ending listings, for the home page preview.
pub fn featured(items: &[Listing], count: usize) -> Vec<Listing> {
    let sorted = sort_listings(items.iter().collect(), ListingSortBy::EndingSoon);
    sorted.into_iter().take(count).cloned().collect()
}

/// Literal, case-insensitive title containment. No search text matches everything.
pub fn matches_search(listing: &Listing, search: Option<&str>) -> bool {
    match search {
        None | Some("") => true,
        Some(search) => listing
            .title
            .to_lowercase()
            .contains(&search.to_lowercase()),
    }
}

/// Case-insensitive category equality. Uncategorized listings never match a
/// non-empty filter.
pub fn matches_category(listing: &Listing, category: Option<&str>) -> bool {
    match category {
        None | Some("") => true,
        Some(category) => listing
            .category
            .as_deref()
            .is_some_and(|own| own.to_lowercase() == category.to_lowercase()),
    }
}

/// Comparator for a sort order. `sort_by` is stable, so equal keys keep
/// their input order.
pub fn comparator(sort_by: ListingSortBy) -> fn(&Listing, &Listing) -> Ordering {
    match sort_by {
        ListingSortBy::PriceAsc => by_price_asc,
        ListingSortBy::PriceDesc => by_price_desc,
        ListingSortBy::EndingSoon => by_ending_soon,
        ListingSortBy::Hot => by_hot,
        ListingSortBy::Unsorted => keep_order,
    }
}

fn by_price_asc(a: &Listing, b: &Listing) -> Ordering {
    a.effective_price().cmp(&b.effective_price())
}

fn by_price_desc(a: &Listing, b: &Listing) -> Ordering {
    b.effective_price().cmp(&a.effective_price())
}

fn by_ending_soon(a: &Listing, b: &Listing) -> Ordering {
    a.end_time.cmp(&b.end_time)
}

// Missing recent-bid counts rank as zero.
fn by_hot(a: &Listing, b: &Listing) -> Ordering {
    b.recent_bids.unwrap_or(0).cmp(&a.recent_bids.unwrap_or(0))
}

fn keep_order(_: &Listing, _: &Listing) -> Ordering {
    Ordering::Equal
}

fn sort_listings(mut listings: Vec<&Listing>, sort_by: ListingSortBy) -> Vec<&Listing> {
    let compare = comparator(sort_by);
    listings.sort_by(|a, b| compare(a, b));
    listings
}

fn paginate(sorted: &[&Listing], page: u32, page_size: NonZeroUsize) -> ListingPage {
    let total_count = sorted.len();
    let page_index = page.max(1) as usize - 1;
    let start = page_index.saturating_mul(page_size.get());
    let end = start.saturating_add(page_size.get());
    let listings = if start < total_count {
        sorted[start..end.min(total_count)]
            .iter()
            .map(|listing| (*listing).clone())
            .collect()
    } else {
        Vec::new()
    };
    ListingPage {
        listings,
        has_more: end < total_count,
        total_count,
    }
}
