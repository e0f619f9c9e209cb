use super::ids::ExecutionId;
use super::trade::TradeSide;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An unbalanced execution sequence: a position still open at the end of the
/// snapshot.
///
/// Not an error and not a trade — a first-class output, excluded from every
/// closed-trade aggregate until it closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenPosition {
    pub account: String,
    pub symbol: String,
    pub side: TradeSide,
    /// Open size, positive.
    pub quantity: f64,
    /// Quantity-weighted average entry price.
    pub entry_price: f64,
    pub opened_at: DateTime<Utc>,
    /// Commission accrued so far, ≤ 0.
    pub commission: f64,
    pub execution_ids: Vec<ExecutionId>,
}

impl OpenPosition {
    /// Unrealized P&L at a mark price, before commissions.
    pub fn unrealized_pnl(&self, mark_price: f64, multiplier: f64) -> f64 {
        (mark_price - self.entry_price) * self.quantity * self.side.sign() * multiplier
    }
}
