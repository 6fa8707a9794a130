//! Trading module for positions and stake preparation.
//!
//! This module handles:
//! - Position types and portfolio summaries
//! - Stake quotes and client-side stake checks

pub mod position;
pub mod quote;

pub use position::{PortfolioSummary, Position};
pub use quote::{max_stake_for, validate_stake, StakeQuote, PAYOUT_PER_SHARE};
