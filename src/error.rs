//! Unified error types for the marketplace.

use std::path::PathBuf;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::wallet::WalletKind;

/// Unified error type for the marketplace.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Wallet connection error.
    #[error("wallet error: {0}")]
    Wallet(#[from] WalletError),

    /// Contract call error.
    #[error("contract error: {0}")]
    Contract(#[from] ContractError),

    /// Market catalog error.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Key-value storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Client-side validation error.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Wallet provider and session errors.
#[derive(Error, Debug)]
pub enum WalletError {
    /// The provider refused the connection request.
    #[error("{kind} wallet rejected the connection: {reason}")]
    Rejected {
        /// Wallet that rejected.
        kind: WalletKind,
        /// Reason reported by the provider.
        reason: String,
    },

    /// Provider returned something that is not a Stacks principal.
    #[error("invalid stacks address: {0}")]
    InvalidAddress(String),

    /// Operation requires a connected wallet.
    #[error("wallet is not connected")]
    NotConnected,
}

/// Contract call errors.
#[derive(Error, Debug)]
pub enum ContractError {
    /// Contract function call failed.
    #[error("contract call {function} failed: {reason}")]
    CallFailed {
        /// Contract function name (e.g. `place-stake`).
        function: &'static str,
        /// Reason for failure.
        reason: String,
    },
}

/// Market catalog errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Catalog document could not be parsed.
    #[error("failed to parse market catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// Catalog file could not be read.
    #[error("failed to read market catalog {path}: {source}")]
    Read {
        /// Path that failed.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// No market with the requested id.
    #[error("market {0} not found")]
    MarketNotFound(String),
}

/// Key-value storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Storage file IO failed.
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    /// Storage file is not a JSON object of strings.
    #[error("storage file is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

/// Client-side validation failures for stake and market forms.
///
/// The contract facade never validates; callers run these checks before
/// submitting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No wallet is connected.
    #[error("connect a wallet first")]
    WalletNotConnected,

    /// Stake amount is zero or negative.
    #[error("stake amount must be positive")]
    NonPositiveAmount,

    /// Stake below the market minimum.
    #[error("minimum stake is {min} STX (got {amount})")]
    BelowMinimum {
        /// Requested amount.
        amount: Decimal,
        /// Market minimum.
        min: Decimal,
    },

    /// Stake above the market maximum.
    #[error("maximum stake is {max} STX (got {amount})")]
    AboveMaximum {
        /// Requested amount.
        amount: Decimal,
        /// Market maximum.
        max: Decimal,
    },

    /// Stake exceeds the wallet balance.
    #[error("insufficient balance: need {amount} STX, have {balance} STX")]
    InsufficientBalance {
        /// Requested amount.
        amount: Decimal,
        /// Wallet balance.
        balance: Decimal,
    },

    /// Market is resolved or cancelled.
    #[error("market {0} is not active")]
    MarketNotActive(String),

    /// Required form field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Stake bounds are not `0 < min <= max`.
    #[error("stake bounds must satisfy 0 < min <= max")]
    InvalidStakeBounds,
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ForecastError>;
