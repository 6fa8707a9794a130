//! Simulated contract client.
//!
//! Each call sleeps for a fixed delay and returns a fabricated success
//! record. Nothing is validated, stored or changed, so calls never affect
//! the catalog or later queries.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::config::LatencyProfile;
use crate::error::ContractError;
use crate::market::Outcome;
use crate::metrics::CallTimer;
use crate::trading::Position;
use crate::utils::timestamp_id;

use super::client::ContractClient;
use super::types::{
    CreateMarketParams, CreateMarketReceipt, PayoutReceipt, PlaceStakeParams, ResolveReceipt,
    StakeReceipt,
};

/// Smallest fabricated payout.
pub const MIN_MOCK_PAYOUT: u32 = 100;
/// Largest fabricated payout.
pub const MAX_MOCK_PAYOUT: u32 = 1099;

/// Mock contract client.
#[derive(Debug, Clone)]
pub struct MockContractClient {
    latency: LatencyProfile,
}

impl MockContractClient {
    /// Create a client with default delays.
    pub fn new() -> Self {
        Self::with_latency(LatencyProfile::default())
    }

    /// Create a client with custom delays.
    pub fn with_latency(latency: LatencyProfile) -> Self {
        Self { latency }
    }

    /// Create a client whose calls resolve immediately.
    pub fn instant() -> Self {
        Self::with_latency(LatencyProfile::instant())
    }

    async fn simulate(delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    /// The fixed positions every address reports.
    fn canned_positions() -> Vec<Position> {
        vec![
            Position {
                market_id: "btc-price-2024".to_string(),
                outcome: Outcome::Yes,
                amount: Decimal::new(50, 0),
                current_value: Decimal::new(65, 0),
                pnl: Decimal::new(15, 0),
            },
            Position {
                market_id: "eth-merge-impact".to_string(),
                outcome: Outcome::No,
                amount: Decimal::new(25, 0),
                current_value: Decimal::new(20, 0),
                pnl: Decimal::new(-5, 0),
            },
        ]
    }
}

impl Default for MockContractClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContractClient for MockContractClient {
    #[instrument(skip(self, params), fields(title = %params.title))]
    async fn create_market(
        &self,
        params: CreateMarketParams,
    ) -> Result<CreateMarketReceipt, ContractError> {
        let _timer = CallTimer::new("create-market");
        Self::simulate(self.latency.create_market).await;

        info!(?params, "Creating market");
        Ok(CreateMarketReceipt {
            success: true,
            market_id: Some(timestamp_id("market")),
        })
    }

    #[instrument(skip(self))]
    async fn place_stake(&self, params: PlaceStakeParams) -> Result<StakeReceipt, ContractError> {
        let _timer = CallTimer::new("place-stake");
        Self::simulate(self.latency.place_stake).await;

        info!(
            market_id = %params.market_id,
            outcome = %params.outcome,
            amount = %params.amount,
            "Placing stake"
        );
        Ok(StakeReceipt {
            success: true,
            transaction_id: Some(timestamp_id("tx")),
        })
    }

    #[instrument(skip(self))]
    async fn resolve_market(
        &self,
        market_id: &str,
        winner: Outcome,
    ) -> Result<ResolveReceipt, ContractError> {
        let _timer = CallTimer::new("resolve-market");
        Self::simulate(self.latency.resolve_market).await;

        info!("Resolving market {} winner: {}", market_id, winner);
        Ok(ResolveReceipt { success: true })
    }

    #[instrument(skip(self))]
    async fn claim_payout(&self, market_id: &str) -> Result<PayoutReceipt, ContractError> {
        let _timer = CallTimer::new("claim-payout");
        Self::simulate(self.latency.claim_payout).await;

        let amount = rand::thread_rng().gen_range(MIN_MOCK_PAYOUT..=MAX_MOCK_PAYOUT);
        info!("Claiming payout for market {}", market_id);
        Ok(PayoutReceipt {
            success: true,
            amount: Some(Decimal::from(amount)),
        })
    }

    #[instrument(skip(self))]
    async fn user_positions(&self, address: &str) -> Result<Vec<Position>, ContractError> {
        let _timer = CallTimer::new("get-user-positions");
        Self::simulate(self.latency.positions).await;

        info!("Fetching positions for user {}", address);
        Ok(Self::canned_positions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use time::macros::datetime;

    fn create_params() -> CreateMarketParams {
        CreateMarketParams {
            title: "Will STX flip $5?".to_string(),
            description: "Daily close above $5.".to_string(),
            category: "crypto".to_string(),
            resolution_date: datetime!(2025-06-30 00:00:00 UTC),
            min_stake: dec!(1),
            max_stake: dec!(100),
        }
    }

    #[tokio::test]
    async fn create_market_returns_market_id() {
        let client = MockContractClient::instant();
        let receipt = client.create_market(create_params()).await.unwrap();

        assert!(receipt.success);
        assert!(receipt.market_id.unwrap().starts_with("market-"));
    }

    #[tokio::test]
    async fn create_market_does_not_validate() {
        let client = MockContractClient::instant();
        let params = CreateMarketParams {
            title: String::new(),
            min_stake: dec!(-5),
            ..create_params()
        };

        assert!(client.create_market(params).await.unwrap().success);
    }

    #[tokio::test]
    async fn place_stake_returns_tx_id() {
        let client = MockContractClient::instant();
        let receipt = client
            .place_stake(PlaceStakeParams {
                market_id: "btc-price-2024".to_string(),
                outcome: Outcome::Yes,
                amount: dec!(10),
            })
            .await
            .unwrap();

        assert!(receipt.success);
        assert!(receipt.transaction_id.unwrap().starts_with("tx-"));
    }

    #[tokio::test]
    async fn resolve_market_succeeds() {
        let client = MockContractClient::instant();
        let receipt = client.resolve_market("anything", Outcome::No).await.unwrap();
        assert!(receipt.success);
    }

    #[tokio::test]
    async fn claim_payout_stays_in_range() {
        let client = MockContractClient::instant();
        for _ in 0..200 {
            let amount = client.claim_payout("btc-price-2024").await.unwrap().amount.unwrap();
            assert!(amount >= dec!(100) && amount <= dec!(1099), "out of range: {}", amount);
            assert_eq!(amount.fract(), Decimal::ZERO);
        }
    }

    #[tokio::test]
    async fn positions_ignore_placed_stakes() {
        let client = MockContractClient::instant();
        let before = client.user_positions("SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7").await.unwrap();

        client
            .place_stake(PlaceStakeParams {
                market_id: "sbtc-tvl-1b".to_string(),
                outcome: Outcome::No,
                amount: dec!(42),
            })
            .await
            .unwrap();

        let after = client.user_positions("anyone").await.unwrap();
        assert_eq!(before, after);
        assert_eq!(after.len(), 2);
        assert_eq!(after[1].pnl, dec!(-5));
    }

    #[tokio::test(start_paused = true)]
    async fn calls_wait_their_delays() {
        let client = MockContractClient::new();
        let start = tokio::time::Instant::now();

        client.resolve_market("m", Outcome::Yes).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(1200));
    }
}
