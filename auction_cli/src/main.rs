mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use auction_lib::{CachedClient, Config};
use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "auction")]
#[command(about = "Browse auction listings from the marketplace backend")]
struct Cli {
    /// Output format: table, json, csv, markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query one page of listings
    Listings(commands::listings::ListingsArgs),
    /// Show the featured listings preview
    Featured,
    /// List the category catalogue
    Categories,
    /// Page through all matching listings with infinite scroll
    Browse(commands::browse::BrowseArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("auction=info".parse()?),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        "markdown" | "md" => OutputFormat::Markdown,
        _ => OutputFormat::Table,
    };

    let config = Config::load(cli.config.as_deref())?;
    tracing::debug!("Using {:?}", config);
    let client = CachedClient::new(config.build_client(), config.build_cache());

    match &cli.command {
        Commands::Listings(args) => commands::listings::run(args, &client, &format).await?,
        Commands::Featured => commands::featured::run(&client, &format).await?,
        Commands::Categories => commands::categories::run(&client, &format).await?,
        Commands::Browse(args) => {
            commands::browse::run(args, &client, config.trigger(), &format).await?
        }
    }

    Ok(())
}
