//! CLI subcommand implementations.

pub mod browse;
pub mod categories;
pub mod featured;
pub mod listings;
