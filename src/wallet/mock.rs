//! Simulated wallet provider.
//!
//! Connects after a fixed delay and returns a canned account per wallet
//! kind. Nothing talks to a real extension.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::config::LatencyProfile;
use crate::error::WalletError;

use super::provider::WalletProvider;
use super::types::{DetectedWallets, WalletAccount, WalletKind};

/// Canned Leather account.
pub const LEATHER_ADDRESS: &str = "SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7";
/// Canned Xverse account.
pub const XVERSE_ADDRESS: &str = "SP3FBR2AGK5H9QBDH3EEN6DF8EK8JY7RX8QJ5SVTE";

/// Canned Leather balance (125075 / 100 = 1250.75 STX).
pub fn leather_balance() -> Decimal {
    Decimal::new(125_075, 2)
}

/// Canned Xverse balance (890.25 STX).
pub fn xverse_balance() -> Decimal {
    Decimal::new(89_025, 2)
}

/// Configuration for mock provider behavior.
#[derive(Debug, Clone)]
pub struct MockWalletConfig {
    /// Leather connect delay.
    pub leather_delay: Duration,
    /// Xverse connect delay.
    pub xverse_delay: Duration,
    /// Reject every connect request.
    pub reject_connect: bool,
    /// Return this address instead of the canned one.
    pub address_override: Option<String>,
    /// What `detect` reports.
    pub detected: DetectedWallets,
}

impl Default for MockWalletConfig {
    fn default() -> Self {
        Self::from_latency(&LatencyProfile::default())
    }
}

impl MockWalletConfig {
    /// Take the connect delays from a latency profile.
    pub fn from_latency(latency: &LatencyProfile) -> Self {
        Self {
            leather_delay: latency.leather_connect,
            xverse_delay: latency.xverse_connect,
            reject_connect: false,
            address_override: None,
            detected: DetectedWallets {
                leather: true,
                xverse: true,
            },
        }
    }
}

/// Mock wallet provider.
#[derive(Debug, Clone, Default)]
pub struct MockWalletProvider {
    config: MockWalletConfig,
}

impl MockWalletProvider {
    /// Create a provider with default delays.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider with custom configuration.
    pub fn with_config(config: MockWalletConfig) -> Self {
        Self { config }
    }

    /// Create a provider that connects without delay.
    pub fn instant() -> Self {
        Self::with_config(MockWalletConfig::from_latency(&LatencyProfile::instant()))
    }

    fn delay_for(&self, kind: WalletKind) -> Duration {
        match kind {
            WalletKind::Leather => self.config.leather_delay,
            WalletKind::Xverse => self.config.xverse_delay,
        }
    }

    fn canned_account(kind: WalletKind) -> WalletAccount {
        match kind {
            WalletKind::Leather => WalletAccount {
                address: LEATHER_ADDRESS.to_string(),
                kind,
                balance: leather_balance(),
            },
            WalletKind::Xverse => WalletAccount {
                address: XVERSE_ADDRESS.to_string(),
                kind,
                balance: xverse_balance(),
            },
        }
    }
}

#[async_trait]
impl WalletProvider for MockWalletProvider {
    async fn connect(&self, kind: WalletKind) -> Result<WalletAccount, WalletError> {
        let delay = self.delay_for(kind);
        debug!(wallet = %kind, delay_ms = delay.as_millis() as u64, "Simulating wallet handshake");
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if self.config.reject_connect {
            return Err(WalletError::Rejected {
                kind,
                reason: "Mock connect rejection".to_string(),
            });
        }

        let mut account = Self::canned_account(kind);
        if let Some(address) = &self.config.address_override {
            account.address = address.clone();
        }

        info!(wallet = %kind, address = %account.address, "Connected to {} wallet", kind);
        Ok(account)
    }

    fn detect(&self) -> DetectedWallets {
        self.config.detected
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
