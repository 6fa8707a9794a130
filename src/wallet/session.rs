//! Wallet session ownership.
//!
//! [`WalletManager`] owns the one mutable piece of state in the marketplace.
//! Every mutation goes through its methods; callers only ever see snapshots.

use std::str::FromStr;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use tracing::{info, instrument, warn};

use crate::error::WalletError;
use crate::metrics;
use crate::storage::KeyValueStore;
use crate::utils::is_stacks_address;

use super::provider::WalletProvider;
use super::types::{DetectedWallets, WalletKind, WalletSession};

/// Storage key for the last connected wallet kind.
pub const CONNECTED_WALLET_KEY: &str = "connectedWallet";

/// Owns the wallet session and funnels connect/disconnect through a provider.
///
/// Clones share the same session. Overlapping `connect` calls are not
/// guarded: each one overwrites the session when it completes.
pub struct WalletManager<P> {
    provider: Arc<P>,
    session: Arc<RwLock<WalletSession>>,
    store: Arc<dyn KeyValueStore>,
}

impl<P> Clone for WalletManager<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            session: Arc::clone(&self.session),
            store: Arc::clone(&self.store),
        }
    }
}

impl<P: WalletProvider> WalletManager<P> {
    /// Create a manager with a disconnected session.
    pub fn new(provider: P, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            provider: Arc::new(provider),
            session: Arc::new(RwLock::new(WalletSession::default())),
            store,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, WalletSession> {
        self.session.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, WalletSession> {
        self.session.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> WalletSession {
        self.read().clone()
    }

    /// Whether a wallet is connected.
    pub fn is_connected(&self) -> bool {
        self.read().connected
    }

    /// Snapshot of the session, failing when disconnected.
    pub fn require_connected(&self) -> Result<WalletSession, WalletError> {
        let session = self.session();
        if session.connected {
            Ok(session)
        } else {
            Err(WalletError::NotConnected)
        }
    }

    /// Which wallets the provider reports as available.
    pub fn detect(&self) -> DetectedWallets {
        self.provider.detect()
    }

    /// Connect to the wallet of `kind`.
    ///
    /// Sets `connecting` for the duration of the provider handshake. On
    /// success the whole session is replaced and the wallet kind is echoed to
    /// storage; on failure only `connecting` is cleared.
    #[instrument(skip(self), fields(provider = self.provider.name()))]
    pub async fn connect(&self, kind: WalletKind) -> Result<WalletSession, WalletError> {
        let start = Instant::now();
        self.write().connecting = true;

        let account = match self.provider.connect(kind).await {
            Ok(account) => account,
            Err(e) => {
                warn!("Failed to connect to {} wallet: {}", kind, e);
                self.write().connecting = false;
                metrics::inc_wallet_connect_failures();
                return Err(e);
            }
        };

        if !is_stacks_address(&account.address) {
            warn!(address = %account.address, "Provider returned a malformed address");
            self.write().connecting = false;
            metrics::inc_wallet_connect_failures();
            return Err(WalletError::InvalidAddress(account.address));
        }

        let session = WalletSession::connected(account);
        *self.write() = session.clone();
        self.persist(Some(kind));
        metrics::record_wallet_connect(&kind.to_string(), start);

        Ok(session)
    }

    /// Reset the session to its disconnected default.
    pub fn disconnect(&self) {
        *self.write() = WalletSession::default();
        self.persist(None);
        metrics::inc_wallet_disconnects();
        info!("Wallet disconnected");
    }

    /// Read the stored wallet kind from a previous run.
    ///
    /// Only logs what it finds; the session stays disconnected.
    pub fn restore(&self) -> Option<WalletKind> {
        let saved = self.store.get(CONNECTED_WALLET_KEY)?;
        match WalletKind::from_str(&saved) {
            Ok(kind) => {
                info!("Auto-reconnecting to {}", kind);
                Some(kind)
            }
            Err(_) => {
                warn!(value = %saved, "Ignoring unknown stored wallet kind");
                None
            }
        }
    }

    fn persist(&self, kind: Option<WalletKind>) {
        // The echo is best-effort: a storage failure never undoes a connect.
        let result = match kind {
            Some(kind) => self.store.set(CONNECTED_WALLET_KEY, &kind.to_string()),
            None => self.store.remove(CONNECTED_WALLET_KEY),
        };
        if let Err(e) = result {
            warn!("Failed to persist wallet kind: {}", e);
        }
    }
}
