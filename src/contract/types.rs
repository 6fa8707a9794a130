//! Contract call parameters and receipts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use time::OffsetDateTime;

use crate::error::ValidationError;
use crate::market::Outcome;

/// Every violated rule, in check order. Rarely more than a couple.
pub type ValidationErrors = SmallVec<[ValidationError; 4]>;

/// Parameters for `create-market`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMarketParams {
    /// Market question.
    pub title: String,
    /// Resolution criteria.
    pub description: String,
    /// Category tag.
    pub category: String,
    /// When the market resolves.
    #[serde(with = "time::serde::rfc3339")]
    pub resolution_date: OffsetDateTime,
    /// Minimum stake (STX).
    pub min_stake: Decimal,
    /// Maximum stake (STX).
    pub max_stake: Decimal,
}

impl CreateMarketParams {
    /// Form checks run before submitting. The contract client never calls
    /// this.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.title.trim().is_empty() {
            errors.push(ValidationError::MissingField("title"));
        }
        if self.description.trim().is_empty() {
            errors.push(ValidationError::MissingField("description"));
        }
        if self.category.trim().is_empty() {
            errors.push(ValidationError::MissingField("category"));
        }
        if self.min_stake <= Decimal::ZERO || self.max_stake < self.min_stake {
            errors.push(ValidationError::InvalidStakeBounds);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Copy with surrounding whitespace stripped from the text fields.
    pub fn trimmed(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            category: self.category.trim().to_string(),
            ..self.clone()
        }
    }
}

/// Parameters for `place-stake`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceStakeParams {
    /// Market to stake on.
    pub market_id: String,
    /// Chosen side.
    pub outcome: Outcome,
    /// Amount (STX).
    pub amount: Decimal,
}

/// Result of `create-market`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMarketReceipt {
    /// Whether the call succeeded.
    pub success: bool,
    /// New market identifier.
    pub market_id: Option<String>,
}

/// Result of `place-stake`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeReceipt {
    /// Whether the call succeeded.
    pub success: bool,
    /// Transaction identifier.
    pub transaction_id: Option<String>,
}

/// Result of `resolve-market`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveReceipt {
    /// Whether the call succeeded.
    pub success: bool,
}

/// Result of `claim-payout`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutReceipt {
    /// Whether the call succeeded.
    pub success: bool,
    /// Amount paid out (STX).
    pub amount: Option<Decimal>,
}
