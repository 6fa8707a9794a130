//! Wallet session types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::utils::short_address;

/// Supported browser wallets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum WalletKind {
    /// Leather (formerly Hiro Wallet).
    Leather,
    /// Xverse.
    Xverse,
}

/// Account details a provider hands back after connecting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletAccount {
    /// Stacks principal.
    pub address: String,
    /// Which wallet produced it.
    pub kind: WalletKind,
    /// STX balance.
    pub balance: Decimal,
}

/// Which wallet providers appear to be installed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectedWallets {
    /// Leather provider present.
    pub leather: bool,
    /// Xverse provider present.
    pub xverse: bool,
}

impl DetectedWallets {
    /// Whether `kind` was detected.
    pub fn has(&self, kind: WalletKind) -> bool {
        match kind {
            WalletKind::Leather => self.leather,
            WalletKind::Xverse => self.xverse,
        }
    }
}

/// In-memory wallet session state.
///
/// `Default` is the disconnected state every session starts in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WalletSession {
    /// A wallet is connected.
    pub connected: bool,
    /// Connected address.
    pub address: Option<String>,
    /// Connected wallet kind.
    pub wallet_kind: Option<WalletKind>,
    /// STX balance, zero when disconnected.
    pub balance: Decimal,
    /// A connect is in flight.
    pub connecting: bool,
}

impl WalletSession {
    /// Session for a freshly connected account.
    pub fn connected(account: WalletAccount) -> Self {
        Self {
            connected: true,
            address: Some(account.address),
            wallet_kind: Some(account.kind),
            balance: account.balance,
            connecting: false,
        }
    }

    /// Shortened address for display, empty when disconnected.
    pub fn short_address(&self) -> String {
        self.address.as_deref().map(short_address).unwrap_or_default()
    }
}
