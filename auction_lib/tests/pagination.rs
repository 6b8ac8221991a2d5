use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use auction_lib::auction_api::engine;
use auction_lib::types::{Listing, ListingPage};
use auction_lib::{AuctionError, ItemSource, ListingQuery, LoadOutcome, PaginationController};
use chrono::{TimeZone, Utc};

type Delay = Box<dyn Fn(&ListingQuery) -> Duration + Send + Sync>;

/// Serves listings through the real query pipeline with a per-request delay
/// and switchable failures.
struct ScriptedSource {
    listings: Vec<Listing>,
    page_size: NonZeroUsize,
    delay: Delay,
    failing_pages: Mutex<HashSet<u32>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    fn new(listings: Vec<Listing>, page_size: usize, delay: Delay) -> Self {
        Self {
            listings,
            page_size: NonZeroUsize::new(page_size).unwrap(),
            delay,
            failing_pages: Mutex::new(HashSet::new()),
            calls: AtomicUsize::new(0),
        }
    }

    fn fail_page(&self, page: u32) {
        self.failing_pages.lock().unwrap().insert(page);
    }

    fn heal(&self) {
        self.failing_pages.lock().unwrap().clear();
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ItemSource for ScriptedSource {
    async fn fetch_featured(&self) -> Result<Vec<Listing>, AuctionError> {
        Ok(engine::featured(&self.listings, 8))
    }

    async fn fetch_page(&self, query: &ListingQuery) -> Result<ListingPage, AuctionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Whether a request fails is decided when it is sent.
        let fail = self.failing_pages.lock().unwrap().contains(&query.common.page);
        tokio::time::sleep((self.delay)(query)).await;
        if fail {
            return Err(AuctionError::Api(auction_lib::auction_api::Error::RequestFailed(
                "connection reset".to_string(),
            )));
        }
        Ok(engine::query(&self.listings, query, self.page_size))
    }
}

fn listing(id: usize, title: &str) -> Listing {
    Listing {
        id: id.to_string(),
        title: title.to_string(),
        image_url: String::new(),
        starting_price: 100,
        current_bid: None,
        bid_count: 0,
        end_time: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
            + chrono::Duration::minutes(id as i64),
        category: None,
        recent_bids: None,
    }
}

/// Ten "apple" listings followed by three "banana" listings.
fn fruit() -> Vec<Listing> {
    let mut listings: Vec<Listing> = (1..=10).map(|i| listing(i, "Apple crate")).collect();
    listings.extend((11..=13).map(|i| listing(i, "Banana bunch")));
    listings
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn ids(listings: &[Listing]) -> Vec<String> {
    listings.iter().map(|l| l.id.clone()).collect()
}

#[tokio::test(start_paused = true)]
async fn ten_matches_load_in_two_pages() {
    let source = ScriptedSource::new(fruit(), 8, Box::new(|_| ms(300)));
    let controller = PaginationController::new(source);

    controller.set_search("apple").await.unwrap();
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.listings.len(), 8);
    assert!(snapshot.has_more);
    assert_eq!(snapshot.total_count, 10);

    assert_eq!(controller.load_more().await.unwrap(), LoadOutcome::Applied);
    let snapshot = controller.snapshot();
    assert_eq!(ids(&snapshot.listings), (1..=10).map(|i| i.to_string()).collect::<Vec<_>>());
    assert!(!snapshot.has_more);
    assert_eq!(snapshot.page, 2);
}

#[tokio::test(start_paused = true)]
async fn late_response_from_superseded_filters_is_discarded() {
    let delay: Delay = Box::new(|q| match q.search.as_deref() {
        Some("apple") => ms(500),
        _ => ms(10),
    });
    let controller = PaginationController::new(ScriptedSource::new(fruit(), 8, delay));

    let (first, second) = tokio::join!(
        controller.set_filters(ListingQuery::default().with_search("apple")),
        async {
            tokio::time::sleep(ms(1)).await;
            controller
                .set_filters(ListingQuery::default().with_search("banana"))
                .await
        }
    );

    assert_eq!(first.unwrap(), LoadOutcome::Stale);
    assert_eq!(second.unwrap(), LoadOutcome::Applied);
    let snapshot = controller.snapshot();
    assert_eq!(ids(&snapshot.listings), vec!["11", "12", "13"]);
    assert_eq!(snapshot.total_count, 3);
    assert_eq!(snapshot.filters.search.as_deref(), Some("banana"));
    assert!(!snapshot.loading);
}

#[tokio::test(start_paused = true)]
async fn sequential_filter_changes_both_apply() {
    let controller =
        PaginationController::new(ScriptedSource::new(fruit(), 8, Box::new(|_| ms(10))));

    let (first, second) = tokio::join!(
        controller.set_search("apple"),
        async {
            tokio::time::sleep(ms(50)).await;
            controller.set_search("banana").await
        }
    );
    assert_eq!(first.unwrap(), LoadOutcome::Applied);
    assert_eq!(second.unwrap(), LoadOutcome::Applied);
    assert_eq!(controller.snapshot().total_count, 3);
}

#[tokio::test(start_paused = true)]
async fn load_more_in_flight_is_discarded_by_filter_change() {
    let delay: Delay = Box::new(|q| if q.common.page > 1 { ms(500) } else { ms(10) });
    let controller = PaginationController::new(ScriptedSource::new(fruit(), 4, delay));
    controller.set_filters(ListingQuery::default()).await.unwrap();
    assert_eq!(controller.snapshot().listings.len(), 4);

    let (more, change) = tokio::join!(controller.load_more(), async {
        tokio::time::sleep(ms(20)).await;
        controller.set_search("banana").await
    });

    assert_eq!(more.unwrap(), LoadOutcome::Stale);
    assert_eq!(change.unwrap(), LoadOutcome::Applied);
    let snapshot = controller.snapshot();
    assert_eq!(ids(&snapshot.listings), vec!["11", "12", "13"]);
    assert_eq!(snapshot.page, 1);
    assert!(!snapshot.loading_more);
    assert!(!snapshot.has_more);
}

#[tokio::test(start_paused = true)]
async fn load_more_is_allowed_again_after_filter_change_supersedes_it() {
    let delay: Delay = Box::new(|q| if q.common.page > 1 { ms(500) } else { ms(10) });
    let controller = PaginationController::new(ScriptedSource::new(fruit(), 4, delay));
    controller.set_filters(ListingQuery::default()).await.unwrap();

    let (stale, fresh) = tokio::join!(controller.load_more(), async {
        tokio::time::sleep(ms(20)).await;
        controller.set_search("apple").await.unwrap();
        controller.load_more().await
    });

    assert_eq!(stale.unwrap(), LoadOutcome::Stale);
    assert_eq!(fresh.unwrap(), LoadOutcome::Applied);
    let snapshot = controller.snapshot();
    assert_eq!(ids(&snapshot.listings), vec!["1", "2", "3", "4", "5", "6", "7", "8"]);
    assert_eq!(snapshot.page, 2);
}

#[tokio::test(start_paused = true)]
async fn concurrent_load_more_fetches_once() {
    let controller =
        PaginationController::new(ScriptedSource::new(fruit(), 4, Box::new(|_| ms(100))));
    controller.set_filters(ListingQuery::default()).await.unwrap();

    let (a, b) = tokio::join!(controller.load_more(), controller.load_more());
    let mut outcomes = vec![a.unwrap(), b.unwrap()];
    outcomes.sort_by_key(|o| *o == LoadOutcome::Skipped);
    assert_eq!(outcomes, vec![LoadOutcome::Applied, LoadOutcome::Skipped]);
    assert_eq!(controller.source().calls(), 2);
    assert_eq!(controller.snapshot().listings.len(), 8);
}

#[tokio::test(start_paused = true)]
async fn load_more_during_initial_load_is_skipped() {
    let controller =
        PaginationController::new(ScriptedSource::new(fruit(), 4, Box::new(|_| ms(100))));
    controller.set_filters(ListingQuery::default()).await.unwrap();

    let (change, more) = tokio::join!(controller.set_search("apple"), async {
        tokio::time::sleep(ms(10)).await;
        controller.load_more().await
    });
    assert_eq!(change.unwrap(), LoadOutcome::Applied);
    assert_eq!(more.unwrap(), LoadOutcome::Skipped);
    assert_eq!(controller.snapshot().page, 1);
}

#[tokio::test(start_paused = true)]
async fn failed_load_more_keeps_accumulated_listings() {
    let controller =
        PaginationController::new(ScriptedSource::new(fruit(), 4, Box::new(|_| ms(50))));
    controller.set_filters(ListingQuery::default()).await.unwrap();
    controller.source().fail_page(2);

    assert!(controller.load_more().await.is_err());
    let snapshot = controller.snapshot();
    assert_eq!(ids(&snapshot.listings), vec!["1", "2", "3", "4"]);
    assert!(!snapshot.loading_more);
    assert!(snapshot.has_more);
    assert_eq!(snapshot.page, 1);

    // No automatic retry: only the next request fetches again.
    assert_eq!(controller.source().calls(), 2);
    controller.source().heal();
    assert_eq!(controller.load_more().await.unwrap(), LoadOutcome::Applied);
    assert_eq!(controller.snapshot().listings.len(), 8);
    assert_eq!(controller.snapshot().page, 2);
}

#[tokio::test(start_paused = true)]
async fn failed_initial_load_leaves_controller_usable() {
    let controller =
        PaginationController::new(ScriptedSource::new(fruit(), 4, Box::new(|_| ms(50))));
    controller.source().fail_page(1);

    assert!(controller.set_search("apple").await.is_err());
    let snapshot = controller.snapshot();
    assert!(!snapshot.loading);
    assert!(snapshot.listings.is_empty());
    assert_eq!(controller.load_more().await.unwrap(), LoadOutcome::Skipped);

    controller.source().heal();
    assert_eq!(
        controller.set_search("apple").await.unwrap(),
        LoadOutcome::Applied
    );
    assert_eq!(controller.snapshot().total_count, 10);
}

#[tokio::test(start_paused = true)]
async fn stale_failure_is_not_reported() {
    let delay: Delay = Box::new(|q| match q.search.as_deref() {
        Some("apple") => ms(500),
        _ => ms(10),
    });
    let source = ScriptedSource::new(fruit(), 8, delay);
    source.fail_page(1);
    let controller = PaginationController::new(source);

    let (first, _) = tokio::join!(controller.set_search("apple"), async {
        tokio::time::sleep(ms(1)).await;
        controller.source().heal();
        controller.set_search("banana").await
    });
    assert_eq!(first.unwrap(), LoadOutcome::Stale);
    assert_eq!(controller.snapshot().total_count, 3);
}

#[tokio::test(start_paused = true)]
async fn subscribers_see_loading_then_results() {
    let controller = Arc::new(PaginationController::new(ScriptedSource::new(
        fruit(),
        4,
        Box::new(|_| ms(100)),
    )));
    let mut rx = controller.subscribe();

    let task = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.set_search("apple").await }
    });

    rx.changed().await.unwrap();
    let loading = rx.borrow_and_update().clone();
    assert!(loading.loading);
    assert!(loading.listings.is_empty());

    assert_eq!(task.await.unwrap().unwrap(), LoadOutcome::Applied);
    rx.changed().await.unwrap();
    let loaded = rx.borrow_and_update().clone();
    assert!(!loaded.loading);
    assert_eq!(loaded.listings.len(), 4);
    assert_eq!(loaded, controller.snapshot());
}
