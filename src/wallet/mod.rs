//! Wallet module.
//!
//! This module handles:
//! - Wallet session state
//! - The provider port real wallets plug into
//! - A timed mock provider with canned accounts
//! - Session ownership, persistence of the wallet kind

pub mod mock;
pub mod provider;
pub mod session;
pub mod types;

pub use mock::{MockWalletConfig, MockWalletProvider};
pub use provider::WalletProvider;
pub use session::{WalletManager, CONNECTED_WALLET_KEY};
pub use types::{DetectedWallets, WalletAccount, WalletKind, WalletSession};
