//! Wallet provider port.

use async_trait::async_trait;

use crate::error::WalletError;

use super::types::{DetectedWallets, WalletAccount, WalletKind};

/// Capability boundary to a browser wallet.
///
/// Implementations perform the actual handshake; the session bookkeeping
/// lives in [`WalletManager`](super::WalletManager).
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the wallet of `kind` for an account.
    async fn connect(&self, kind: WalletKind) -> Result<WalletAccount, WalletError>;

    /// Report which wallets are available.
    fn detect(&self) -> DetectedWallets;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}
