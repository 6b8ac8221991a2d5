//! Error types for the listings source.

/// Errors that can occur when fetching from the listings source.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A fetch failed in transport (simulated or real).
    #[error("Request failed: {0}")]
    RequestFailed(String),
    /// A listing violates the model invariants and cannot be served.
    #[error("Invalid listing {id}: {reason}")]
    InvalidListing { id: String, reason: String },
}
