use auction_api::types::{Listing, ListingPage};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[test]
fn deserialize_listing_page() {
    let body = load_fixture("listings.json");
    let page: ListingPage = serde_json::from_str(&body).unwrap();
    assert_eq!(page.listings.len(), 3);
    assert_eq!(page.total_count, 3);
    assert!(!page.has_more);

    let omega = &page.listings[0];
    assert_eq!(omega.current_bid, Some(65500));
    assert_eq!(omega.category.as_deref(), Some("Watches"));
    assert_eq!(omega.recent_bids, Some(6));
    assert_eq!(omega.end_time.to_rfc3339(), "2024-03-01T14:00:00+00:00");
}

#[test]
fn deserialize_listing_without_optional_fields() {
    let body = load_fixture("listings.json");
    let page: ListingPage = serde_json::from_str(&body).unwrap();
    let chair = &page.listings[2];
    assert_eq!(chair.current_bid, None);
    assert_eq!(chair.category, None);
    assert_eq!(chair.recent_bids, None);
    assert_eq!(chair.effective_price(), 12000);
}

#[test]
fn listing_page_serializes_camel_case() {
    let page = ListingPage {
        listings: Vec::new(),
        has_more: true,
        total_count: 12,
    };
    let json = serde_json::to_value(&page).unwrap();
    assert_eq!(json["hasMore"], true);
    assert_eq!(json["totalCount"], 12);
}

#[test]
fn listing_rejects_negative_price() {
    let json = serde_json::json!({
        "id": "9",
        "title": "Broken",
        "imageUrl": "",
        "startingPrice": -5,
        "currentBid": null,
        "bidCount": 0,
        "endTime": "2024-03-01T14:00:00Z"
    });
    assert!(serde_json::from_value::<Listing>(json).is_err());
}
