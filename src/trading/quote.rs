//! Stake quotes and pre-submission checks.
//!
//! Each winning share pays out 1 STX at settlement, so a stake buys
//! `amount / price` shares.

use rust_decimal::Decimal;

use crate::contract::ValidationErrors;
use crate::error::ValidationError;
use crate::market::{Market, Outcome};
use crate::wallet::WalletSession;

/// Payout per winning share (STX).
pub const PAYOUT_PER_SHARE: Decimal = Decimal::ONE;

/// What a stake would buy at the current price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StakeQuote {
    /// Side being bought.
    pub outcome: Outcome,
    /// Stake amount (STX).
    pub amount: Decimal,
    /// Current share price.
    pub price: Decimal,
    /// Shares bought.
    pub shares: Decimal,
    /// Payout if the side wins.
    pub payout: Decimal,
    /// Payout minus stake.
    pub profit: Decimal,
}

impl StakeQuote {
    /// Quote `amount` on `outcome`. `None` when the price is not positive.
    pub fn new(market: &Market, outcome: Outcome, amount: Decimal) -> Option<Self> {
        let price = market.price_for(outcome);
        if price <= Decimal::ZERO {
            return None;
        }

        let shares = amount.checked_div(price)?;
        let payout = shares * PAYOUT_PER_SHARE;
        Some(Self {
            outcome,
            amount,
            price,
            shares,
            payout,
            profit: payout - amount,
        })
    }
}

/// Largest stake the session can place on `market`.
pub fn max_stake_for(market: &Market, session: &WalletSession) -> Decimal {
    market.max_stake.min(session.balance)
}

/// Check a stake before submitting it. Reports every violated rule.
pub fn validate_stake(
    market: &Market,
    amount: Decimal,
    session: &WalletSession,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if !session.connected {
        errors.push(ValidationError::WalletNotConnected);
    }
    if !market.is_active() {
        errors.push(ValidationError::MarketNotActive(market.id.clone()));
    }

    if amount <= Decimal::ZERO {
        errors.push(ValidationError::NonPositiveAmount);
    } else {
        if amount < market.min_stake {
            errors.push(ValidationError::BelowMinimum {
                amount,
                min: market.min_stake,
            });
        }
        if amount > market.max_stake {
            errors.push(ValidationError::AboveMaximum {
                amount,
                max: market.max_stake,
            });
        }
        // Balance only means something once connected.
        if session.connected && amount > session.balance {
            errors.push(ValidationError::InsufficientBalance {
                amount,
                balance: session.balance,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
