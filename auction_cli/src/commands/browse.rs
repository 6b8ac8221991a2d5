use std::time::Duration;

use anyhow::{bail, Result};
use auction_lib::auction_api::Client;
use auction_lib::scroll::LoadMoreSignal;
use auction_lib::{
    drive_load_more, load_more_channel, CachedClient, PaginationController, ProximityTrigger,
    ViewportMetrics,
};
use chrono::Utc;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use crate::commands::listings::build_filters;
use crate::output::{
    print_json, print_listings_csv, print_listings_markdown, print_listings_table, OutputFormat,
};

const SENTINEL_HEIGHT: f64 = 1.0;

#[derive(Args)]
pub struct BrowseArgs {
    /// Search listing titles (case-insensitive)
    #[arg(long)]
    pub search: Option<String>,

    /// Filter by category (e.g. Watches, Cameras, Art)
    #[arg(long)]
    pub category: Option<String>,

    /// Sort order: ending-soon, hot, price-asc, price-desc
    #[arg(long, default_value = "ending-soon")]
    pub sort: String,

    /// Stop after this many pages
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// Simulated viewport height in pixels
    #[arg(long, default_value = "600")]
    pub viewport_height: f64,

    /// Simulated height of one listing row in pixels
    #[arg(long, default_value = "120")]
    pub row_height: f64,
}

type Controller<'a> = PaginationController<&'a CachedClient<Client>>;

pub async fn run(
    args: &BrowseArgs,
    client: &CachedClient<Client>,
    trigger: ProximityTrigger,
    format: &OutputFormat,
) -> Result<()> {
    let filters = build_filters(args.search.as_deref(), args.category.as_deref(), &args.sort)?;
    let controller = PaginationController::new(client);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Loading listings...");

    if let Err(e) = controller.set_filters(filters).await {
        spinner.finish_and_clear();
        return Err(e.into());
    }

    let first = controller.snapshot();
    if first.is_empty() {
        spinner.finish_and_clear();
        eprintln!("No listings found. Try adjusting your search or filters.");
        return Ok(());
    }

    let (signal, events) = load_more_channel(trigger);
    let (pages, scrolled) = tokio::join!(
        drive_load_more(&controller, events),
        scroll_to_end(&controller, signal, args, &spinner, format),
    );
    spinner.finish_and_clear();
    scrolled?;

    let last = controller.snapshot();
    match format {
        OutputFormat::Json => print_json(&last.listings),
        OutputFormat::Csv => print_listings_csv(&last.listings, Utc::now())?,
        OutputFormat::Table | OutputFormat::Markdown => {}
    }

    eprintln!(
        "Loaded {} of {} listings in {} pages",
        last.listings.len(),
        last.total_count,
        pages + 1
    );
    eprintln!("Address: ?{}", controller.address());

    Ok(())
}

/// Keeps the simulated viewport pinned to the bottom of the list, printing
/// each batch as it arrives, until nothing more can be loaded. Dropping the
/// signal on return stops the load-more driver.
async fn scroll_to_end(
    controller: &Controller<'_>,
    signal: LoadMoreSignal,
    args: &BrowseArgs,
    spinner: &ProgressBar,
    format: &OutputFormat,
) -> Result<()> {
    let mut rx = controller.subscribe();
    let mut printed = 0;
    let mut requested_at: Option<usize> = None;

    loop {
        let snapshot = rx.borrow_and_update().clone();

        if snapshot.listings.len() > printed {
            let batch = &snapshot.listings[printed..];
            spinner.suspend(|| print_batch(batch, format));
            printed = snapshot.listings.len();
        }

        if snapshot.loading_more {
            spinner.set_message(format!("Loading page {}...", snapshot.page + 1));
        } else {
            if let Some(before) = requested_at.take() {
                if snapshot.listings.len() == before && snapshot.has_more {
                    bail!("Failed to load page {}", snapshot.page + 1);
                }
            }
            if !snapshot.has_more {
                break;
            }
            if args.max_pages.is_some_and(|max| snapshot.page >= max) {
                break;
            }

            spinner.set_message(format!(
                "{} of {} listings",
                snapshot.listings.len(),
                snapshot.total_count
            ));
            let metrics = ViewportMetrics::at_bottom(
                printed as f64 * args.row_height,
                args.viewport_height,
                SENTINEL_HEIGHT,
            );
            if !signal.observe(&metrics, &snapshot) {
                // Sentinel out of reach: nothing will change on its own.
                break;
            }
            requested_at = Some(snapshot.listings.len());
        }

        if rx.changed().await.is_err() {
            break;
        }
    }

    Ok(())
}

fn print_batch(batch: &[auction_lib::types::Listing], format: &OutputFormat) {
    match format {
        OutputFormat::Table => print_listings_table(batch, Utc::now()),
        OutputFormat::Markdown => print_listings_markdown(batch, Utc::now()),
        OutputFormat::Json | OutputFormat::Csv => {}
    }
}
