use anyhow::Result;
use auction_lib::auction_api::Client;
use auction_lib::validation;
use auction_lib::{CachedClient, ItemSource, ListingQuery, Query};
use clap::Args;

use crate::output::{
    print_json, print_listings_csv, print_listings_markdown, print_listings_table, OutputFormat,
};

#[derive(Args)]
pub struct ListingsArgs {
    /// Search listing titles (case-insensitive)
    #[arg(long)]
    pub search: Option<String>,

    /// Filter by category (e.g. Watches, Cameras, Art)
    #[arg(long)]
    pub category: Option<String>,

    /// Sort order: ending-soon, hot, price-asc, price-desc
    #[arg(long, default_value = "ending-soon")]
    pub sort: String,

    /// Page number
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Results per page (defaults to the configured page size)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Take all filters from an address query string, e.g. "q=leica&sort=hot&page=2"
    #[arg(long, conflicts_with_all = ["search", "category", "sort", "page", "page_size"])]
    pub address: Option<String>,
}

/// Builds filters from the shared search/category/sort flags.
pub(crate) fn build_filters(
    search: Option<&str>,
    category: Option<&str>,
    sort: &str,
) -> Result<ListingQuery> {
    let mut query = ListingQuery::default().with_sort_by(validation::validate_sort_by(sort)?);

    if let Some(search) = search {
        if let Some(validated) = validation::validate_search(search)? {
            query = query.with_search(&validated);
        }
    }

    if let Some(category) = category {
        if let Some(validated) = validation::validate_category(category)? {
            query = query.with_category(&validated);
        }
    }

    Ok(query)
}

pub async fn run(
    args: &ListingsArgs,
    client: &CachedClient<Client>,
    format: &OutputFormat,
) -> Result<()> {
    let query = match &args.address {
        Some(address) => ListingQuery::from_query_string(address),
        None => {
            let mut query =
                build_filters(args.search.as_deref(), args.category.as_deref(), &args.sort)?
                    .with_page(validation::validate_page(args.page)?);
            if let Some(page_size) = args.page_size {
                query = query.with_page_size(validation::validate_page_size(page_size)?);
            }
            query
        }
    };

    let page = client.fetch_page(&query).await?;

    eprintln!(
        "Page {} ({} total listings{})",
        query.common.page,
        page.total_count,
        if page.has_more { ", more available" } else { "" }
    );
    let address = query.to_query_string();
    if !address.is_empty() {
        eprintln!("Address: ?{}", address);
    }

    match format {
        OutputFormat::Table => print_listings_table(&page.listings, chrono::Utc::now()),
        OutputFormat::Json => print_json(&page),
        OutputFormat::Csv => print_listings_csv(&page.listings, chrono::Utc::now())?,
        OutputFormat::Markdown => print_listings_markdown(&page.listings, chrono::Utc::now()),
    }

    Ok(())
}
