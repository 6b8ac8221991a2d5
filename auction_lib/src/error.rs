//! Error types for the library layer.

use std::fmt;

/// Errors produced by the library layer, wrapping listing source errors
/// and adding the failures raised locally by this crate.
#[derive(Debug)]
pub enum AuctionError {
    /// An error from the underlying listing source.
    Api(auction_api::Error),
    /// A cached page could not be decoded.
    Serialization(serde_json::Error),
    /// User-provided input failed validation.
    InvalidInput(String),
    /// The configuration file or environment could not be loaded.
    Config(String),
}

impl fmt::Display for AuctionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "Source error: {}", e),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::Config(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for AuctionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<auction_api::Error> for AuctionError {
    fn from(e: auction_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<serde_json::Error> for AuctionError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}
