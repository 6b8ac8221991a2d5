//! Runtime configuration: built-in defaults, then an optional TOML file, then
//! `AUCTION_*` environment variables.

use std::path::Path;
use std::time::Duration;

use auction_api::{Client, DEFAULT_FEATURED_COUNT, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};

use crate::cache::MemoryCache;
use crate::error::AuctionError;
use crate::scroll::{ProximityTrigger, DEFAULT_ROOT_MARGIN, DEFAULT_THRESHOLD};
use crate::validation;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Listings per page.
    pub page_size: usize,
    /// Listings in the home page preview.
    pub featured_count: usize,
    /// Simulated latency for listing pages.
    pub listings_latency_ms: u64,
    /// Simulated latency for the featured preview and categories.
    pub featured_latency_ms: u64,
    /// Probability that a simulated fetch fails.
    pub failure_rate: f64,
    /// Lifetime of cached pages. Zero disables caching.
    pub cache_ttl_secs: u64,
    /// Load-more trigger distance beyond the viewport, in pixels.
    pub root_margin: f64,
    /// Visible fraction of the sentinel that triggers a load.
    pub threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            featured_count: DEFAULT_FEATURED_COUNT,
            listings_latency_ms: 300,
            featured_latency_ms: 200,
            failure_rate: 0.0,
            cache_ttl_secs: 300,
            root_margin: DEFAULT_ROOT_MARGIN,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl Config {
    /// Loads defaults, overlays the TOML file at `path` if given, then the
    /// process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, AuctionError> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    AuctionError::Config(format!("cannot read {}: {}", path.display(), e))
                })?;
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };
        let config = config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, AuctionError> {
        toml::from_str(text).map_err(|e| AuctionError::Config(e.to_string()))
    }

    /// Overrides fields from `AUCTION_*` variables looked up through `lookup`.
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, AuctionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = env_parse(&lookup, "AUCTION_PAGE_SIZE")? {
            self.page_size = v;
        }
        if let Some(v) = env_parse(&lookup, "AUCTION_FEATURED_COUNT")? {
            self.featured_count = v;
        }
        if let Some(v) = env_parse(&lookup, "AUCTION_LATENCY_MS")? {
            self.listings_latency_ms = v;
        }
        if let Some(v) = env_parse(&lookup, "AUCTION_FEATURED_LATENCY_MS")? {
            self.featured_latency_ms = v;
        }
        if let Some(v) = env_parse(&lookup, "AUCTION_FAILURE_RATE")? {
            self.failure_rate = v;
        }
        if let Some(v) = env_parse(&lookup, "AUCTION_CACHE_TTL_SECS")? {
            self.cache_ttl_secs = v;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), AuctionError> {
        validation::validate_page_size(self.page_size)?;
        if !(0.0..=1.0).contains(&self.failure_rate) {
            return Err(AuctionError::Config(format!(
                "failure_rate must be between 0 and 1, got {}",
                self.failure_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(AuctionError::Config(format!(
                "threshold must be between 0 and 1, got {}",
                self.threshold
            )));
        }
        Ok(())
    }

    /// The mock listings backend described by this configuration.
    pub fn build_client(&self) -> Client {
        Client::new()
            .with_page_size(self.page_size)
            .with_featured_count(self.featured_count)
            .with_latency(
                Duration::from_millis(self.listings_latency_ms),
                Duration::from_millis(self.featured_latency_ms),
            )
            .with_failure_rate(self.failure_rate)
    }

    pub fn build_cache(&self) -> MemoryCache {
        MemoryCache::new(Duration::from_secs(self.cache_ttl_secs))
    }

    pub fn trigger(&self) -> ProximityTrigger {
        ProximityTrigger::new(self.root_margin, self.threshold)
    }
}

fn env_parse<T, F>(lookup: &F, key: &str) -> Result<Option<T>, AuctionError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| AuctionError::Config(format!("{} has invalid value '{}'", key, raw))),
    }
}
