//! Market module for yes/no prediction markets.
//!
//! This module handles:
//! - Market types and data structures
//! - The static market catalog
//! - Listing search, filter and sort

pub mod catalog;
pub mod query;
pub mod types;

pub use catalog::{CatalogSource, MarketCatalog};
pub use query::{status_counts, MarketQuery, SortKey, StatusCounts};
pub use types::{Market, MarketStatus, Outcome};
