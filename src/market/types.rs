//! Market-related types for yes/no prediction markets.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use time::OffsetDateTime;

/// Market outcome.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Outcome {
    /// The event happens.
    #[strum(serialize = "yes")]
    #[default]
    Yes,
    /// The event does not happen.
    #[strum(serialize = "no")]
    No,
}

impl Outcome {
    /// Get the opposite outcome.
    pub fn opposite(&self) -> Self {
        match self {
            Outcome::Yes => Outcome::No,
            Outcome::No => Outcome::Yes,
        }
    }
}

/// Market lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum MarketStatus {
    /// Accepting stakes.
    #[strum(serialize = "active")]
    Active,
    /// Winner decided.
    #[strum(serialize = "resolved")]
    Resolved,
    /// Voided.
    #[strum(to_string = "cancelled", serialize = "canceled")]
    #[serde(alias = "canceled")]
    Cancelled,
}

/// A yes/no prediction market as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    /// Unique market identifier (e.g. "btc-price-2024").
    pub id: String,
    /// Market question.
    pub title: String,
    /// Resolution criteria.
    pub description: String,
    /// Category tag (crypto, defi, nft, regulation, ...).
    pub category: String,
    /// When the market resolves.
    #[serde(with = "time::serde::rfc3339")]
    pub resolution_date: OffsetDateTime,
    /// When the market was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Aggregate traded volume.
    pub volume: Decimal,
    /// Aggregate staked amount (STX).
    pub total_staked: Decimal,
    /// YES price, nominally in [0, 1].
    pub yes_price: Decimal,
    /// NO price, nominally in [0, 1].
    pub no_price: Decimal,
    /// Amount staked on YES.
    pub yes_stakes: Decimal,
    /// Amount staked on NO.
    pub no_stakes: Decimal,
    /// Lifecycle status.
    pub status: MarketStatus,
    /// Winning side, only present once resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Outcome>,
    /// Creator principal.
    pub creator: String,
    /// Minimum stake (STX).
    pub min_stake: Decimal,
    /// Maximum stake (STX).
    pub max_stake: Decimal,
}

impl Market {
    const SECONDS_PER_DAY: i64 = 86_400;

    /// Whether the market still accepts stakes.
    pub fn is_active(&self) -> bool {
        self.status == MarketStatus::Active
    }

    /// Whether a winner has been declared.
    pub fn is_resolved(&self) -> bool {
        self.status == MarketStatus::Resolved
    }

    /// Price of one share of `outcome`.
    pub fn price_for(&self, outcome: Outcome) -> Decimal {
        match outcome {
            Outcome::Yes => self.yes_price,
            Outcome::No => self.no_price,
        }
    }

    /// Amount staked on `outcome`.
    pub fn stake_for(&self, outcome: Outcome) -> Decimal {
        match outcome {
            Outcome::Yes => self.yes_stakes,
            Outcome::No => self.no_stakes,
        }
    }

    /// Price of `outcome` in whole cents (0.65 -> 65).
    pub fn odds_cents(&self, outcome: Outcome) -> Decimal {
        (self.price_for(outcome) * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Whole days until resolution, rounded up. Negative once past.
    pub fn days_remaining(&self, now: OffsetDateTime) -> i64 {
        let secs = (self.resolution_date - now).whole_seconds();
        // Truncating division is already the ceiling for negative spans.
        let days = secs / Self::SECONDS_PER_DAY;
        if secs % Self::SECONDS_PER_DAY > 0 {
            days + 1
        } else {
            days
        }
    }
}
