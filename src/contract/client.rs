//! Contract client port.

use async_trait::async_trait;

use crate::error::ContractError;
use crate::market::Outcome;
use crate::trading::Position;

use super::types::{
    CreateMarketParams, CreateMarketReceipt, PayoutReceipt, PlaceStakeParams, ResolveReceipt,
    StakeReceipt,
};

/// Capability boundary to the prediction-market contract.
///
/// Implementations do no input validation; callers validate first.
#[async_trait]
pub trait ContractClient: Send + Sync {
    /// Call `create-market`.
    async fn create_market(
        &self,
        params: CreateMarketParams,
    ) -> Result<CreateMarketReceipt, ContractError>;

    /// Call `place-stake`.
    async fn place_stake(&self, params: PlaceStakeParams) -> Result<StakeReceipt, ContractError>;

    /// Call `resolve-market`.
    async fn resolve_market(
        &self,
        market_id: &str,
        winner: Outcome,
    ) -> Result<ResolveReceipt, ContractError>;

    /// Call `claim-payout`.
    async fn claim_payout(&self, market_id: &str) -> Result<PayoutReceipt, ContractError>;

    /// Read-only query of a user's positions across all markets.
    async fn user_positions(&self, address: &str) -> Result<Vec<Position>, ContractError>;
}
