//! End-to-end flows across the catalog, wallet session and contract mock.
//!
//! Everything runs with zero simulated latency except the tests that check
//! the delays themselves, which use tokio's paused clock.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use time::macros::datetime;
use tokio_test::{assert_err, assert_ok};

use forecast_btc::config::LatencyProfile;
use forecast_btc::contract::{ContractClient, CreateMarketParams, MockContractClient, PlaceStakeParams};
use forecast_btc::error::ValidationError;
use forecast_btc::market::{
    status_counts, CatalogSource, MarketCatalog, MarketQuery, Outcome, SortKey,
};
use forecast_btc::storage::{FileStore, KeyValueStore, MemoryStore};
use forecast_btc::trading::{validate_stake, PortfolioSummary, StakeQuote};
use forecast_btc::wallet::{
    MockWalletProvider, WalletKind, WalletManager, WalletSession, CONNECTED_WALLET_KEY,
};

fn memory_wallet() -> WalletManager<MockWalletProvider> {
    WalletManager::new(MockWalletProvider::instant(), Arc::new(MemoryStore::new()))
}

async fn embedded_catalog() -> MarketCatalog {
    MarketCatalog::load(&CatalogSource::Embedded, Duration::ZERO)
        .await
        .expect("embedded catalog parses")
}

#[tokio::test]
async fn stake_flow_leaves_catalog_untouched() {
    let catalog = embedded_catalog().await;
    let wallet = memory_wallet();
    let contract = MockContractClient::instant();

    let session = wallet.connect(WalletKind::Leather).await.unwrap();
    let market = catalog.require("btc-price-2024").unwrap();

    assert_ok!(validate_stake(market, dec!(65), &session));
    let quote = StakeQuote::new(market, Outcome::Yes, dec!(65)).unwrap();
    assert_eq!(quote.shares, dec!(100));
    assert_eq!(quote.profit, dec!(35));

    let receipt = contract
        .place_stake(PlaceStakeParams {
            market_id: market.id.clone(),
            outcome: Outcome::Yes,
            amount: dec!(65),
        })
        .await
        .unwrap();
    assert!(receipt.success);
    assert!(receipt.transaction_id.unwrap().starts_with("tx-"));

    let reloaded = embedded_catalog().await;
    assert_eq!(catalog, reloaded);
}

#[tokio::test]
async fn created_markets_never_appear_in_catalog() {
    let before = embedded_catalog().await;
    let contract = MockContractClient::instant();

    let params = CreateMarketParams {
        title: "  Will sBTC peg hold through 2025?  ".to_string(),
        description: "Resolves YES if the peg never breaks.".to_string(),
        category: "defi".to_string(),
        resolution_date: datetime!(2025-12-31 00:00:00 UTC),
        min_stake: dec!(5),
        max_stake: dec!(500),
    }
    .trimmed();
    assert_ok!(params.validate());

    let receipt = contract.create_market(params).await.unwrap();
    let id = receipt.market_id.unwrap();
    assert!(id.starts_with("market-"));

    let after = embedded_catalog().await;
    assert!(after.get(&id).is_none());
    assert_eq!(before.len(), after.len());
}

#[tokio::test]
async fn dashboard_reports_fixed_positions() {
    let wallet = memory_wallet();
    let contract = MockContractClient::instant();

    let session = wallet.connect(WalletKind::Xverse).await.unwrap();
    let address = session.address.unwrap();
    let positions = contract.user_positions(&address).await.unwrap();
    let summary = PortfolioSummary::from_positions(&positions);

    assert_eq!(summary.positions, 2);
    assert_eq!(summary.total_invested, dec!(75));
    assert_eq!(summary.total_current_value, dec!(85));
    assert_eq!(summary.total_pnl, dec!(10));
    assert_eq!(summary.winning, 1);
    assert_eq!(summary.win_rate, dec!(50));
    assert_eq!(summary.return_pct.round_dp(2), dec!(13.33));

    // Positions do not depend on who asks.
    assert_eq!(positions, contract.user_positions("someone-else").await.unwrap());
}

#[tokio::test]
async fn stake_is_rejected_without_wallet() {
    let catalog = embedded_catalog().await;
    let wallet = memory_wallet();
    let market = catalog.require("sbtc-tvl-1b").unwrap();

    let errors = validate_stake(market, dec!(10), &wallet.session()).unwrap_err();
    assert_eq!(errors.as_slice(), &[ValidationError::WalletNotConnected]);
}

#[tokio::test]
async fn resolved_market_rejects_stake() {
    let catalog = embedded_catalog().await;
    let wallet = memory_wallet();
    let session = wallet.connect(WalletKind::Leather).await.unwrap();
    let market = catalog.require("eth-merge-impact").unwrap();

    let errors = assert_err!(validate_stake(market, dec!(10), &session));
    assert!(errors.contains(&ValidationError::MarketNotActive("eth-merge-impact".to_string())));
}

#[tokio::test]
async fn wallet_kind_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("storage.json");

    {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&path).unwrap());
        let wallet = WalletManager::new(MockWalletProvider::instant(), store);
        wallet.connect(WalletKind::Xverse).await.unwrap();
    }

    let store = Arc::new(FileStore::open(&path).unwrap());
    assert_eq!(store.get(CONNECTED_WALLET_KEY).as_deref(), Some("xverse"));
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"connectedWallet\""), "unexpected storage layout: {}", raw);

    let wallet = WalletManager::new(MockWalletProvider::instant(), store.clone());
    assert_eq!(wallet.restore(), Some(WalletKind::Xverse));
    // Restoring only reports the kind; the session stays disconnected.
    assert_eq!(wallet.session(), WalletSession::default());

    wallet.disconnect();
    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.get(CONNECTED_WALLET_KEY), None);
}

#[tokio::test]
async fn catalog_queries_are_repeatable() {
    let catalog = embedded_catalog().await;
    let query = MarketQuery::new().category("defi").sort(SortKey::Stakes);

    let first: Vec<&str> = query.apply(catalog.markets()).iter().map(|m| m.id.as_str()).collect();
    let second: Vec<&str> = query.apply(catalog.markets()).iter().map(|m| m.id.as_str()).collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);

    let counts = status_counts(catalog.markets());
    assert_eq!((counts.active, counts.resolved, counts.cancelled), (5, 2, 1));

    let by_volume = MarketQuery::new().apply(catalog.markets());
    assert_eq!(by_volume[0].id, "us-spot-etf-approval");
}

#[tokio::test]
async fn file_catalog_overrides_embedded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("markets.json");

    let embedded = embedded_catalog().await;
    let single = format!("[{}]", serde_json::to_string(&embedded.markets()[0]).unwrap());
    std::fs::write(&path, single).unwrap();

    let catalog = MarketCatalog::load(&CatalogSource::File(path), Duration::ZERO)
        .await
        .unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.markets()[0], embedded.markets()[0]);
}

#[tokio::test(start_paused = true)]
async fn default_latency_is_observable() {
    let latency = LatencyProfile::default();
    let contract = MockContractClient::with_latency(latency);
    let start = tokio::time::Instant::now();

    let receipt = contract.claim_payout("us-spot-etf-approval").await.unwrap();

    assert!(start.elapsed() >= latency.claim_payout);
    let amount = receipt.amount.unwrap();
    assert!(amount >= Decimal::from(100) && amount <= Decimal::from(1099));
}
