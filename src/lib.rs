//! ForecastBTC: a simulated prediction market for Bitcoin-ecosystem events.
//!
//! Nothing here touches a chain. Wallet connections and contract calls are
//! timed simulations that return canned results, and the market list is a
//! fixed catalog that never changes at runtime.
//!
//! ```text
//! Market: "Will BTC close above $100k?"
//! YES price: 0.65   NO price: 0.35
//! ─────────────────────────────────
//! Stake 70 STX on NO  → 200 shares
//! Payout if NO wins   → 200 STX (+130)
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`market`]: Market types, the static catalog and list queries
//! - [`wallet`]: Wallet session and the provider port
//! - [`contract`]: Contract client port and its mock
//! - [`trading`]: Positions, portfolio summary and stake quotes
//! - [`storage`]: Key-value store for the connected-wallet echo
//! - [`metrics`]: Simulated-call metrics
//! - [`utils`]: Utility functions

pub mod config;
pub mod contract;
pub mod error;
pub mod market;
pub mod metrics;
pub mod storage;
pub mod trading;
pub mod utils;
pub mod wallet;

pub use config::Config;
pub use error::{ForecastError, Result};
