//! Trade summaries — the aggregate shape shared by totals and groups.

use roundturn_core::domain::{Outcome, RoundTurnTrade};
use serde::{Deserialize, Serialize};

/// Aggregate statistics over a set of closed trades.
///
/// Degenerate ratios are `None` ("undefined"), never NaN or infinity:
/// - `win_rate` when there are no decisive (non-scratch) trades
/// - `average_win` / `average_loss` when there are no wins / losses
/// - `profit_factor` when gross losses are zero
///
/// Scratches (net exactly zero) count in `trades` and `scratches` but are
/// excluded from the win-rate denominator by convention.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeSummary {
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub scratches: usize,

    pub gross_proceeds: f64,
    /// Sum of commissions, ≤ 0.
    pub commission: f64,
    pub net_proceeds: f64,

    /// Sum of net proceeds over winning trades (≥ 0).
    pub gross_wins: f64,
    /// Sum of net proceeds over losing trades (≤ 0).
    pub gross_losses: f64,

    /// Mean winning net proceeds, as a positive number.
    pub average_win: Option<f64>,
    /// Mean losing net proceeds, as a positive magnitude.
    pub average_loss: Option<f64>,
    /// wins / (wins + losses); scratches excluded from the denominator.
    pub win_rate: Option<f64>,
    /// gross wins / |gross losses|; `None` when there are no losses.
    pub profit_factor: Option<f64>,
}

impl TradeSummary {
    pub fn from_trades<'a, I>(trades: I) -> Self
    where
        I: IntoIterator<Item = &'a RoundTurnTrade>,
    {
        let mut summary = Self::default();
        for trade in trades {
            summary.trades += 1;
            summary.gross_proceeds += trade.gross_proceeds;
            summary.commission += trade.commission;
            summary.net_proceeds += trade.net_proceeds;
            match trade.outcome {
                Outcome::Win => {
                    summary.wins += 1;
                    summary.gross_wins += trade.net_proceeds;
                }
                Outcome::Loss => {
                    summary.losses += 1;
                    summary.gross_losses += trade.net_proceeds;
                }
                Outcome::Scratch => summary.scratches += 1,
            }
        }
        summary.finish();
        summary
    }

    /// Derive the ratio fields from the accumulated counts and sums.
    fn finish(&mut self) {
        let decisive = self.wins + self.losses;
        self.win_rate = if decisive > 0 { Some(self.wins as f64 / decisive as f64) } else { None };
        self.average_win =
            if self.wins > 0 { Some(self.gross_wins / self.wins as f64) } else { None };
        self.average_loss =
            if self.losses > 0 { Some(self.gross_losses.abs() / self.losses as f64) } else { None };
        self.profit_factor = if self.gross_losses < 0.0 {
            Some(self.gross_wins / self.gross_losses.abs())
        } else {
            None
        };
    }
}
