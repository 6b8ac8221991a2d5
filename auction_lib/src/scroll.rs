//! Infinite-scroll trigger: decides when the end-of-list sentinel is close
//! enough to the viewport and turns that into load-more events.
//!
//! The trigger side and the controller side only share a channel. The signal
//! checks the snapshot before emitting, and the controller re-checks its own
//! guard when it consumes the event, so a stale or duplicated event is harmless.

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::pagination::{LoadOutcome, PaginationController, PaginationSnapshot};
use crate::source::ItemSource;

/// Default distance (px) beyond the viewport edges at which the sentinel counts as visible.
pub const DEFAULT_ROOT_MARGIN: f64 = 100.0;
/// Default fraction of the sentinel that must be inside the expanded viewport.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// Geometry of a scrolled list, in pixels from the top of the content.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportMetrics {
    pub scroll_top: f64,
    pub viewport_height: f64,
    pub sentinel_top: f64,
    pub sentinel_height: f64,
}

impl ViewportMetrics {
    /// Metrics for a list scrolled all the way down, with the sentinel placed
    /// directly after `content_height` pixels of content.
    pub fn at_bottom(content_height: f64, viewport_height: f64, sentinel_height: f64) -> Self {
        let scroll_top = (content_height + sentinel_height - viewport_height).max(0.0);
        Self {
            scroll_top,
            viewport_height,
            sentinel_top: content_height,
            sentinel_height,
        }
    }
}

/// Visibility test for the sentinel element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProximityTrigger {
    /// Pixels added above and below the viewport.
    pub root_margin: f64,
    /// Required visible fraction of the sentinel, 0..=1.
    pub threshold: f64,
}

impl Default for ProximityTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_MARGIN, DEFAULT_THRESHOLD)
    }
}

impl ProximityTrigger {
    pub fn new(root_margin: f64, threshold: f64) -> Self {
        let threshold = if threshold.is_nan() {
            DEFAULT_THRESHOLD
        } else {
            threshold.clamp(0.0, 1.0)
        };
        Self {
            root_margin,
            threshold,
        }
    }

    /// True when enough of the sentinel lies inside the margin-expanded viewport.
    pub fn is_intersecting(&self, metrics: &ViewportMetrics) -> bool {
        let root_top = metrics.scroll_top - self.root_margin;
        let root_bottom = metrics.scroll_top + metrics.viewport_height + self.root_margin;
        let sentinel_bottom = metrics.sentinel_top + metrics.sentinel_height;

        if metrics.sentinel_height <= 0.0 {
            return metrics.sentinel_top >= root_top && metrics.sentinel_top <= root_bottom;
        }
        let overlap = root_bottom.min(sentinel_bottom) - root_top.max(metrics.sentinel_top);
        overlap >= 0.0 && overlap / metrics.sentinel_height >= self.threshold
    }
}

/// A request for the next page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadMoreRequested;

/// Emitting half, owned by whatever observes scrolling.
pub struct LoadMoreSignal {
    trigger: ProximityTrigger,
    tx: mpsc::Sender<LoadMoreRequested>,
}

/// Consuming half, handed to [`drive_load_more`].
pub struct LoadMoreEvents {
    rx: mpsc::Receiver<LoadMoreRequested>,
}

/// Creates a load-more channel. At most one request is ever queued; further
/// requests coalesce into it.
pub fn load_more_channel(trigger: ProximityTrigger) -> (LoadMoreSignal, LoadMoreEvents) {
    let (tx, rx) = mpsc::channel(1);
    (LoadMoreSignal { trigger, tx }, LoadMoreEvents { rx })
}

impl LoadMoreSignal {
    /// Emits a load-more request if the sentinel is visible and the snapshot
    /// says another page can be fetched now. Returns whether a request was queued.
    pub fn observe(&self, metrics: &ViewportMetrics, snapshot: &PaginationSnapshot) -> bool {
        if !self.trigger.is_intersecting(metrics) {
            return false;
        }
        if snapshot.loading || snapshot.loading_more || !snapshot.has_more {
            return false;
        }
        match self.tx.try_send(LoadMoreRequested) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => false,
            Err(TrySendError::Closed(_)) => {
                tracing::debug!("Load-more consumer has stopped");
                false
            }
        }
    }
}

impl LoadMoreEvents {
    pub async fn recv(&mut self) -> Option<LoadMoreRequested> {
        self.rx.recv().await
    }
}

/// Feeds load-more events into the controller until every signal is dropped.
/// Failures are logged and do not stop the loop. Returns the number of pages
/// that were appended.
pub async fn drive_load_more<S: ItemSource>(
    controller: &PaginationController<S>,
    mut events: LoadMoreEvents,
) -> usize {
    let mut applied = 0;
    while events.recv().await.is_some() {
        match controller.load_more().await {
            Ok(LoadOutcome::Applied) => applied += 1,
            Ok(outcome) => tracing::debug!("Load-more finished as {:?}", outcome),
            Err(e) => tracing::warn!("Load-more failed: {}", e),
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use auction_api::{Client, ListingQuery};

    use super::*;

    fn metrics(scroll_top: f64, sentinel_top: f64) -> ViewportMetrics {
        ViewportMetrics {
            scroll_top,
            viewport_height: 600.0,
            sentinel_top,
            sentinel_height: 40.0,
        }
    }

    fn ready() -> PaginationSnapshot {
        PaginationSnapshot {
            listings: Vec::new(),
            loading: false,
            loading_more: false,
            has_more: true,
            total_count: 20,
            page: 1,
            filters: ListingQuery::default(),
        }
    }

    #[test]
    fn sentinel_inside_viewport_intersects() {
        let trigger = ProximityTrigger::default();
        assert!(trigger.is_intersecting(&metrics(0.0, 300.0)));
    }

    #[test]
    fn root_margin_extends_viewport() {
        let trigger = ProximityTrigger::default();
        // Viewport ends at 600; the margin reaches to 700.
        assert!(trigger.is_intersecting(&metrics(0.0, 680.0)));
        assert!(!trigger.is_intersecting(&metrics(0.0, 701.0)));
        assert!(!ProximityTrigger::new(0.0, 0.1).is_intersecting(&metrics(0.0, 680.0)));
    }

    #[test]
    fn threshold_requires_visible_fraction() {
        // 2px of a 40px sentinel is 5%.
        let m = metrics(0.0, 698.0);
        assert!(!ProximityTrigger::new(100.0, 0.1).is_intersecting(&m));
        assert!(ProximityTrigger::new(100.0, 0.0).is_intersecting(&m));
    }

    #[test]
    fn sentinel_scrolled_past_does_not_intersect() {
        let trigger = ProximityTrigger::default();
        assert!(!trigger.is_intersecting(&metrics(2000.0, 100.0)));
    }

    #[test]
    fn at_bottom_always_intersects() {
        let trigger = ProximityTrigger::default();
        assert!(trigger.is_intersecting(&ViewportMetrics::at_bottom(5000.0, 600.0, 40.0)));
        assert!(trigger.is_intersecting(&ViewportMetrics::at_bottom(100.0, 600.0, 40.0)));
    }

    #[test]
    fn threshold_is_clamped() {
        assert_eq!(ProximityTrigger::new(0.0, 4.0).threshold, 1.0);
        assert_eq!(ProximityTrigger::new(0.0, f64::NAN).threshold, DEFAULT_THRESHOLD);
    }

    #[tokio::test]
    async fn observe_respects_snapshot_guard() {
        let (signal, mut events) = load_more_channel(ProximityTrigger::default());
        let visible = metrics(0.0, 300.0);

        let mut busy = ready();
        busy.loading_more = true;
        assert!(!signal.observe(&visible, &busy));

        let mut done = ready();
        done.has_more = false;
        assert!(!signal.observe(&visible, &done));

        assert!(!signal.observe(&metrics(0.0, 5000.0), &ready()));

        assert!(signal.observe(&visible, &ready()));
        assert_eq!(events.recv().await, Some(LoadMoreRequested));
    }

    #[tokio::test]
    async fn duplicate_requests_coalesce() {
        let (signal, mut events) = load_more_channel(ProximityTrigger::default());
        let visible = metrics(0.0, 300.0);
        assert!(signal.observe(&visible, &ready()));
        assert!(!signal.observe(&visible, &ready()));
        drop(signal);
        assert_eq!(events.recv().await, Some(LoadMoreRequested));
        assert_eq!(events.recv().await, None);
    }

    #[tokio::test]
    async fn driver_loads_until_signal_dropped() {
        let client = Client::new()
            .with_latency(Duration::ZERO, Duration::ZERO)
            .with_page_size(3);
        let controller = PaginationController::new(client);
        controller.set_filters(ListingQuery::default()).await.unwrap();

        let (signal, events) = load_more_channel(ProximityTrigger::default());
        let scroller = async {
            let mut rx = controller.subscribe();
            loop {
                let snapshot = rx.borrow_and_update().clone();
                if !snapshot.loading_more && !snapshot.has_more {
                    break;
                }
                let content = snapshot.listings.len() as f64 * 100.0;
                signal.observe(&ViewportMetrics::at_bottom(content, 600.0, 40.0), &snapshot);
                if rx.changed().await.is_err() {
                    break;
                }
            }
            drop(signal);
        };

        let (applied, ()) = tokio::join!(drive_load_more(&controller, events), scroller);
        assert_eq!(applied, 2);
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.listings.len(), 8);
        assert_eq!(snapshot.page, 3);
    }
}
