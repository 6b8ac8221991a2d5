use anyhow::Result;
use auction_lib::auction_api::Client;
use auction_lib::{CachedClient, ItemSource};
use chrono::Utc;

use crate::output::{
    print_json, print_listings_csv, print_listings_markdown, print_listings_table, OutputFormat,
};

pub async fn run(client: &CachedClient<Client>, format: &OutputFormat) -> Result<()> {
    let featured = client.fetch_featured().await?;

    eprintln!("{} featured listings", featured.len());

    match format {
        OutputFormat::Table => print_listings_table(&featured, Utc::now()),
        OutputFormat::Json => print_json(&featured),
        OutputFormat::Csv => print_listings_csv(&featured, Utc::now())?,
        OutputFormat::Markdown => print_listings_markdown(&featured, Utc::now()),
    }

    Ok(())
}
