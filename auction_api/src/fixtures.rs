//! Built-in mock catalogue served by [`crate::Client`].

use chrono::{DateTime, Duration, Utc};

use crate::types::{Category, Listing};

/// Category names offered by the category filter, in display order.
pub const CATEGORY_NAMES: [&str; 8] = [
    "Watches",
    "Cameras",
    "Fashion",
    "Furniture",
    "Art",
    "Jewelry",
    "Electronics",
    "Music",
];

/// The mock listings, with end times offset from `now`.
pub(crate) fn mock_listings(now: DateTime<Utc>) -> Vec<Listing> {
    // (title, starting price, current bid, bids, hours left, category, recent bids)
    let seeds: [(&str, u64, Option<u64>, u32, i64, &str, Option<u32>); 8] = [
        ("Vintage Omega Seamaster Automatic Watch", 45000, Some(65500), 24, 2, "Watches", Some(6)),
        ("Leica M6 Film Camera", 25000, Some(32800), 18, 5, "Cameras", Some(3)),
        ("Limited Edition Air Jordan 1 Retro", 12000, Some(20500), 42, 8, "Fashion", Some(11)),
        ("Hermes Birkin Bag", 150000, Some(195000), 15, 24, "Fashion", Some(2)),
        ("Mid-Century Modern Chair - Eames Style", 12000, Some(18500), 9, 48, "Furniture", None),
        ("PlayStation 5 Console Bundle", 14000, Some(15800), 31, 12, "Electronics", Some(8)),
        ("Abstract Art Print - Signed Original", 5000, Some(8500), 7, 72, "Art", Some(1)),
        ("Diamond Tennis Bracelet 18K Gold", 95000, Some(125000), 12, 18, "Jewelry", Some(4)),
    ];

    seeds
        .into_iter()
        .enumerate()
        .map(|(index, (title, starting_price, current_bid, bid_count, hours, category, recent))| {
            let id = (index + 1).to_string();
            Listing {
                image_url: format!("https://picsum.photos/400/300?random={}", id),
                id,
                title: title.to_string(),
                starting_price,
                current_bid,
                bid_count,
                end_time: now + Duration::hours(hours),
                category: Some(category.to_string()),
                recent_bids: recent,
            }
        })
        .collect()
}

/// The category catalogue shown on the home page and in the category filter.
pub(crate) fn mock_categories() -> Vec<Category> {
    let icons = ["watch", "camera", "shirt", "armchair", "palette", "gem", "monitor", "music"];
    let counts = [1243, 856, 2134, 672, 1089, 945, 1567, 432];
    CATEGORY_NAMES
        .iter()
        .zip(icons)
        .zip(counts)
        .enumerate()
        .map(|(index, ((name, icon), item_count))| Category {
            id: (index + 1).to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            item_count,
        })
        .collect()
}
