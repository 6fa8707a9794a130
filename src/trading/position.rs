//! Position tracking.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::market::Outcome;

/// A user's aggregated stake in one market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Market reference.
    pub market_id: String,
    /// Side held.
    pub outcome: Outcome,
    /// Amount staked (STX).
    pub amount: Decimal,
    /// Mark-to-market value (STX).
    pub current_value: Decimal,
    /// Profit/loss (STX).
    pub pnl: Decimal,
}

impl Position {
    /// Whether the position is in profit.
    pub fn is_winning(&self) -> bool {
        self.pnl > Decimal::ZERO
    }

    /// P&L as a percentage of the amount staked.
    pub fn return_pct(&self) -> Option<Decimal> {
        if self.amount.is_zero() {
            return None;
        }
        Some(self.pnl / self.amount * Decimal::ONE_HUNDRED)
    }
}

/// Totals across a set of positions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    /// Number of positions.
    pub positions: usize,
    /// Sum of amounts staked.
    pub total_invested: Decimal,
    /// Sum of current values.
    pub total_current_value: Decimal,
    /// Sum of P&L.
    pub total_pnl: Decimal,
    /// Positions in profit.
    pub winning: usize,
    /// Share of positions in profit, as a percentage. Zero with no positions.
    pub win_rate: Decimal,
    /// Total P&L as a percentage of the amount invested, floored at 1 STX.
    pub return_pct: Decimal,
}

impl PortfolioSummary {
    /// Summarize `positions`.
    pub fn from_positions(positions: &[Position]) -> Self {
        let mut summary = positions.iter().fold(Self::default(), |mut acc, p| {
            acc.positions += 1;
            acc.total_invested += p.amount;
            acc.total_current_value += p.current_value;
            acc.total_pnl += p.pnl;
            if p.is_winning() {
                acc.winning += 1;
            }
            acc
        });

        if summary.positions > 0 {
            summary.win_rate = Decimal::from(summary.winning as u64)
                / Decimal::from(summary.positions as u64)
                * Decimal::ONE_HUNDRED;
        }
        summary.return_pct =
            summary.total_pnl / summary.total_invested.max(Decimal::ONE) * Decimal::ONE_HUNDRED;

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn positions() -> Vec<Position> {
        vec![
            Position {
                market_id: "btc-price-2024".to_string(),
                outcome: Outcome::Yes,
                amount: dec!(50),
                current_value: dec!(65),
                pnl: dec!(15),
            },
            Position {
                market_id: "eth-merge-impact".to_string(),
                outcome: Outcome::No,
                amount: dec!(25),
                current_value: dec!(20),
                pnl: dec!(-5),
            },
        ]
    }

    #[test]
    fn position_calculations() {
        let pos = &positions()[0];
        assert!(pos.is_winning());
        assert_eq!(pos.return_pct(), Some(dec!(30)));

        let flat = Position {
            amount: Decimal::ZERO,
            ..pos.clone()
        };
        assert_eq!(flat.return_pct(), None);
    }

    #[test]
    fn summary_totals() {
        let summary = PortfolioSummary::from_positions(&positions());

        assert_eq!(summary.positions, 2);
        assert_eq!(summary.total_invested, dec!(75));
        assert_eq!(summary.total_current_value, dec!(85));
        assert_eq!(summary.total_pnl, dec!(10));
        assert_eq!(summary.winning, 1);
        assert_eq!(summary.win_rate, dec!(50));
        assert_eq!(summary.return_pct.round_dp(2), dec!(13.33));
    }

    #[test]
    fn return_floors_tiny_investment() {
        let dust = Position {
            market_id: "dust".to_string(),
            outcome: Outcome::Yes,
            amount: dec!(0.5),
            current_value: dec!(2.5),
            pnl: dec!(2),
        };

        let summary = PortfolioSummary::from_positions(&[dust]);
        assert_eq!(summary.return_pct, dec!(200));
        assert_eq!(summary.winning, 1);
    }

    #[test]
    fn empty_summary_has_zero_win_rate() {
        let summary = PortfolioSummary::from_positions(&[]);
        assert_eq!(summary.positions, 0);
        assert_eq!(summary.winning, 0);
        assert_eq!(summary.win_rate, Decimal::ZERO);
        assert_eq!(summary.return_pct, Decimal::ZERO);
    }

    #[test]
    fn position_json_shape() {
        let json = serde_json::to_value(&positions()[1]).unwrap();
        assert_eq!(json["marketId"], "eth-merge-impact");
        assert_eq!(json["outcome"], "no");
    }
}
