//! Round-turn trades — a fully closed position lifecycle, zero to zero.

use super::ids::{ExecutionId, TradeId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a round-turn trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeSide {
    Long,
    Short,
}

impl TradeSide {
    /// +1 for long, -1 for short; multiplies into proceeds.
    pub fn sign(&self) -> f64 {
        match self {
            TradeSide::Long => 1.0,
            TradeSide::Short => -1.0,
        }
    }
}

/// Win/loss classification of a priced trade.
///
/// Scratches (net exactly zero) are tracked separately and excluded from
/// win-rate denominators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Loss,
    Scratch,
}

/// A matched round turn before P&L is applied.
///
/// Constituent signed quantities sum to exactly zero; `quantity` is the total
/// matched size (positive). Prices are quantity-weighted averages across the
/// entry and exit fills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundTurn {
    pub id: TradeId,
    pub account: String,
    pub symbol: String,
    pub side: TradeSide,
    pub opened_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
    pub entry_price: f64,
    pub exit_price: f64,
    pub quantity: f64,
    /// Sum of constituent commissions, ≤ 0.
    pub commission: f64,
    pub execution_ids: Vec<ExecutionId>,
}

impl RoundTurn {
    pub fn duration(&self) -> Duration {
        self.closed_at - self.opened_at
    }
}

/// A priced round-turn trade: the unit everything downstream consumes.
///
/// `tags`, `strategy`, `risk_unit`, and `mfe` are user/collaborator
/// annotations applied after matching; they default to empty/absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundTurnTrade {
    pub id: TradeId,
    pub account: String,
    pub symbol: String,
    pub side: TradeSide,
    pub opened_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
    pub entry_price: f64,
    pub exit_price: f64,
    pub quantity: f64,
    pub commission: f64,

    // ── P&L ──
    pub gross_proceeds: f64,
    pub net_proceeds: f64,
    pub outcome: Outcome,
    /// True when instrument metadata was missing and the multiplier
    /// defaulted to 1.
    pub approximate: bool,

    // ── Annotations ──
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub strategy: Option<String>,
    /// Predefined risk unit for R-multiple normalization.
    #[serde(default)]
    pub risk_unit: Option<f64>,
    /// Recorded maximum favorable excursion.
    #[serde(default)]
    pub mfe: Option<f64>,

    // ── Traceability ──
    pub execution_ids: Vec<ExecutionId>,
}

impl RoundTurnTrade {
    pub fn duration(&self) -> Duration {
        self.closed_at - self.opened_at
    }

    pub fn is_winner(&self) -> bool {
        self.outcome == Outcome::Win
    }

    /// Net proceeds normalized by the annotated risk unit.
    ///
    /// `None` when no risk unit is present (or it is zero) — never coerced
    /// to zero.
    pub fn r_multiple(&self) -> Option<f64> {
        match self.risk_unit {
            Some(r) if r != 0.0 => Some(self.net_proceeds / r),
            _ => None,
        }
    }

    /// Net proceeds as a fraction of the recorded MFE.
    ///
    /// Values outside [-1, 1] are legal (e.g. re-entries extending past the
    /// recorded excursion) and are deliberately not clamped.
    pub fn efficiency(&self) -> Option<f64> {
        match self.mfe {
            Some(mfe) if mfe != 0.0 => Some(self.net_proceeds / mfe),
            _ => None,
        }
    }
}
