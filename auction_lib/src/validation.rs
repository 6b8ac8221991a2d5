use auction_api::{ListingSortBy, CATEGORY_NAMES};

use crate::error::AuctionError;

pub const MAX_SEARCH_LENGTH: usize = 100;
pub const MAX_PAGE_SIZE: usize = 100;

/// Strip ASCII control characters (except space), trim whitespace, and
/// enforce a byte-length limit. Returns `None` when nothing is left.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<Option<String>, AuctionError> {
    if input.len() > max_len {
        return Err(AuctionError::InvalidInput(format!(
            "input exceeds maximum length of {} bytes",
            max_len
        )));
    }
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if sanitized.is_empty() {
        Ok(None)
    } else {
        Ok(Some(sanitized))
    }
}

/// Validate free-text search input. Blank input means "no search".
pub fn validate_search(input: &str) -> Result<Option<String>, AuctionError> {
    sanitize_text(input, MAX_SEARCH_LENGTH)
}

/// Validate a category: case-insensitive against the catalogue, returning the
/// canonical name. Blank input or "all" means "no category filter".
pub fn validate_category(input: &str) -> Result<Option<String>, AuctionError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    CATEGORY_NAMES
        .iter()
        .find(|name| name.eq_ignore_ascii_case(trimmed))
        .map(|name| Some(name.to_string()))
        .ok_or_else(|| {
            AuctionError::InvalidInput(format!(
                "unknown category '{}'. Valid values: all, {}",
                input,
                CATEGORY_NAMES.join(", ").to_lowercase()
            ))
        })
}

/// Validate a sort key. Accepts the address keys and dashed spellings.
pub fn validate_sort_by(input: &str) -> Result<ListingSortBy, AuctionError> {
    let normalized = input.trim().to_lowercase().replace('-', "_");
    match normalized.as_str() {
        "" => Ok(ListingSortBy::default()),
        "price" => Ok(ListingSortBy::PriceAsc),
        other => other.parse().map_err(|_| {
            AuctionError::InvalidInput(format!(
                "unknown sort '{}'. Valid values: ending-soon, hot, price-asc, price-desc",
                input
            ))
        }),
    }
}

pub fn validate_page(page: u32) -> Result<u32, AuctionError> {
    if page == 0 {
        return Err(AuctionError::InvalidInput(
            "page must be 1 or greater".to_string(),
        ));
    }
    Ok(page)
}

pub fn validate_page_size(page_size: usize) -> Result<usize, AuctionError> {
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(AuctionError::InvalidInput(format!(
            "page_size must be between 1 and {}",
            MAX_PAGE_SIZE
        )));
    }
    Ok(page_size)
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
