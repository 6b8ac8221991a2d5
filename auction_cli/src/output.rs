use anyhow::Result;
use auction_lib::format::{format_price, format_time_remaining, is_ending_soon};
use auction_lib::types::{Category, Listing};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

#[derive(Tabled, Serialize)]
struct ListingRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    #[serde(rename = "Title")]
    title: String,
    #[tabled(rename = "Price")]
    #[serde(rename = "Price")]
    price: String,
    #[tabled(rename = "Started At")]
    #[serde(rename = "Started At")]
    started_at: String,
    #[tabled(rename = "Bids")]
    #[serde(rename = "Bids")]
    bids: u32,
    #[tabled(rename = "Ends In")]
    #[serde(rename = "Ends In")]
    ends_in: String,
    #[tabled(rename = "Category")]
    #[serde(rename = "Category")]
    category: String,
}

#[derive(Tabled, Serialize)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    #[serde(rename = "Category")]
    name: String,
    #[tabled(rename = "Listings")]
    #[serde(rename = "Listings")]
    listings: u32,
}

// -- Row builders --

fn build_listing_rows(listings: &[Listing], now: DateTime<Utc>) -> Vec<ListingRow> {
    listings
        .iter()
        .map(|l| ListingRow {
            id: l.id.clone(),
            title: l.title.clone(),
            price: format_price(l.effective_price()),
            // Only shown once bidding has moved the price.
            started_at: if l.effective_price() > l.starting_price {
                format_price(l.starting_price)
            } else {
                String::new()
            },
            bids: l.bid_count,
            ends_in: if is_ending_soon(l.end_time, now) {
                format!("{} (soon)", format_time_remaining(l.end_time, now))
            } else {
                format_time_remaining(l.end_time, now)
            },
            category: l.category.clone().unwrap_or_default(),
        })
        .collect()
}

fn build_category_rows(categories: &[Category]) -> Vec<CategoryRow> {
    categories
        .iter()
        .map(|c| CategoryRow {
            name: c.name.clone(),
            listings: c.item_count,
        })
        .collect()
}

// -- Table output --

pub fn print_listings_table(listings: &[Listing], now: DateTime<Utc>) {
    println!("{}", Table::new(build_listing_rows(listings, now)));
}

pub fn print_categories_table(categories: &[Category]) {
    println!("{}", Table::new(build_category_rows(categories)));
}

// -- Markdown output --

pub fn print_listings_markdown(listings: &[Listing], now: DateTime<Utc>) {
    let mut table = Table::new(build_listing_rows(listings, now));
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_categories_markdown(categories: &[Category]) {
    let mut table = Table::new(build_category_rows(categories));
    table.with(Style::markdown());
    println!("{}", table);
}

// -- CSV output --

pub fn print_listings_csv(listings: &[Listing], now: DateTime<Utc>) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_listing_rows(listings, now) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_categories_csv(categories: &[Category]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_category_rows(categories) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
