use anyhow::Result;
use auction_lib::auction_api::Client;
use auction_lib::CachedClient;

use crate::output::{
    print_categories_csv, print_categories_markdown, print_categories_table, print_json,
    OutputFormat,
};

pub async fn run(client: &CachedClient<Client>, format: &OutputFormat) -> Result<()> {
    let categories = client.inner().fetch_categories().await?;

    match format {
        OutputFormat::Table => print_categories_table(&categories),
        OutputFormat::Json => print_json(&categories),
        OutputFormat::Csv => print_categories_csv(&categories)?,
        OutputFormat::Markdown => print_categories_markdown(&categories),
    }

    Ok(())
}
