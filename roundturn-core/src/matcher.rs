//! Round-turn matcher — converts per-(account, symbol) execution sequences
//! into closed trades plus open positions.
//!
//! Pure function: executions in, `MatchOutcome` out. Each lane maintains a
//! running signed position; the position crossing or landing exactly on zero
//! records a trade boundary. Malformed executions are absorbed as
//! diagnostics, never errors.

use crate::domain::{
    Diagnostic, DiagnosticReason, Execution, ExecutionError, ExecutionId, OpenPosition, RoundTurn,
    TradeId, TradeSide,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Quantity tolerance for detecting a flat position after float accumulation.
const QTY_EPS: f64 = 1e-9;

/// Result of one matching pass over an execution snapshot.
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    /// Closed trades, ordered by close time (ties by account then symbol).
    pub round_turns: Vec<RoundTurn>,
    /// Lanes still unbalanced at the end of the snapshot.
    pub open_positions: Vec<OpenPosition>,
    /// Absorbed data-quality findings.
    pub diagnostics: Vec<Diagnostic>,
}

/// State for the currently open trade in one (account, symbol) lane.
struct OpenLane {
    side: TradeSide,
    /// Remaining open size, positive.
    open_qty: f64,
    /// Total entered size and its quantity-weighted average price.
    entry_qty: f64,
    entry_avg: f64,
    /// Total exited size and its quantity-weighted average price.
    exit_qty: f64,
    exit_avg: f64,
    commission: f64,
    opened_at: DateTime<Utc>,
    execution_ids: Vec<ExecutionId>,
}

impl OpenLane {
    fn open(side: TradeSide, qty: f64, price: f64, commission: f64, at: DateTime<Utc>, id: ExecutionId) -> Self {
        Self {
            side,
            open_qty: qty,
            entry_qty: qty,
            entry_avg: price,
            exit_qty: 0.0,
            exit_avg: 0.0,
            commission,
            opened_at: at,
            execution_ids: vec![id],
        }
    }

    fn add(&mut self, qty: f64, price: f64, commission: f64, id: ExecutionId) {
        self.entry_avg = (self.entry_avg * self.entry_qty + price * qty) / (self.entry_qty + qty);
        self.entry_qty += qty;
        self.open_qty += qty;
        self.commission += commission;
        self.execution_ids.push(id);
    }

    fn reduce(&mut self, qty: f64, price: f64, commission: f64, id: ExecutionId) {
        self.exit_avg = if self.exit_qty == 0.0 {
            price
        } else {
            (self.exit_avg * self.exit_qty + price * qty) / (self.exit_qty + qty)
        };
        self.exit_qty += qty;
        self.open_qty -= qty;
        self.commission += commission;
        self.execution_ids.push(id);
    }

    fn is_flat(&self) -> bool {
        self.open_qty.abs() <= QTY_EPS
    }

    fn into_round_turn(self, account: &str, symbol: &str, closed_at: DateTime<Utc>) -> RoundTurn {
        RoundTurn {
            // Placeholder; final IDs are assigned in close-time order below.
            id: TradeId(0),
            account: account.to_string(),
            symbol: symbol.to_string(),
            side: self.side,
            opened_at: self.opened_at,
            closed_at,
            entry_price: self.entry_avg,
            exit_price: self.exit_avg,
            quantity: self.exit_qty,
            commission: self.commission,
            execution_ids: self.execution_ids,
        }
    }

    fn into_open_position(self, account: &str, symbol: &str) -> OpenPosition {
        OpenPosition {
            account: account.to_string(),
            symbol: symbol.to_string(),
            side: self.side,
            quantity: self.open_qty,
            entry_price: self.entry_avg,
            opened_at: self.opened_at,
            commission: self.commission,
            execution_ids: self.execution_ids,
        }
    }
}

/// Match an execution snapshot into closed round turns and open positions.
///
/// Executions are partitioned by (account, symbol) and stably sorted by
/// timestamp within each lane, so ties keep their ingestion order. A fill
/// that overshoots zero (a reversal) closes the current trade at zero and
/// opens a new one with the remainder at the reversal fill's price; the
/// fill's commission is allocated proportionally between the two.
pub fn match_executions(executions: &[Execution]) -> MatchOutcome {
    let mut outcome = MatchOutcome::default();

    // Deterministic lane order: BTreeMap over (account, symbol).
    let mut lanes: BTreeMap<(&str, &str), Vec<&Execution>> = BTreeMap::new();
    for execution in executions {
        match execution.validate() {
            Ok(()) => {
                lanes
                    .entry((execution.account.as_str(), execution.symbol.as_str()))
                    .or_default()
                    .push(execution);
            }
            Err(err) => outcome.diagnostics.push(diagnostic_for(err)),
        }
    }

    for ((account, symbol), mut lane_execs) in lanes {
        // Stable sort: equal timestamps keep ingestion order.
        lane_execs.sort_by_key(|e| e.timestamp);
        match_lane(account, symbol, &lane_execs, &mut outcome);
    }

    // Final ordering and ID assignment: close time, ties by lane.
    outcome
        .round_turns
        .sort_by(|a, b| {
            (a.closed_at, &a.account, &a.symbol).cmp(&(b.closed_at, &b.account, &b.symbol))
        });
    for (index, trade) in outcome.round_turns.iter_mut().enumerate() {
        trade.id = TradeId(index as u64 + 1);
    }

    outcome
}

fn match_lane(account: &str, symbol: &str, executions: &[&Execution], outcome: &mut MatchOutcome) {
    let mut lane: Option<OpenLane> = None;

    for execution in executions {
        let qty = execution.size();
        let commission = normalized_commission(execution, &mut outcome.diagnostics);
        let fill_side = if execution.is_buy() { TradeSide::Long } else { TradeSide::Short };

        match lane.take() {
            None => {
                lane = Some(OpenLane::open(
                    fill_side,
                    qty,
                    execution.price,
                    commission,
                    execution.timestamp,
                    execution.id.clone(),
                ));
            }
            Some(mut open) if open.side == fill_side => {
                open.add(qty, execution.price, commission, execution.id.clone());
                lane = Some(open);
            }
            Some(mut open) => {
                let closing = qty.min(open.open_qty);
                let remainder = qty - closing;
                // Proportional commission split across the closing portion
                // and any reversal remainder.
                let closing_commission = commission * (closing / qty);
                open.reduce(closing, execution.price, closing_commission, execution.id.clone());

                if open.is_flat() {
                    outcome
                        .round_turns
                        .push(open.into_round_turn(account, symbol, execution.timestamp));
                    if remainder > QTY_EPS {
                        lane = Some(OpenLane::open(
                            fill_side,
                            remainder,
                            execution.price,
                            commission - closing_commission,
                            execution.timestamp,
                            execution.id.clone(),
                        ));
                    }
                } else {
                    lane = Some(open);
                }
            }
        }
    }

    if let Some(open) = lane {
        outcome.open_positions.push(open.into_open_position(account, symbol));
    }
}

fn diagnostic_for(err: ExecutionError) -> Diagnostic {
    match err {
        ExecutionError::ZeroQuantity { id } => {
            Diagnostic { execution_id: id, reason: DiagnosticReason::ZeroQuantity }
        }
        ExecutionError::NonFinite { id, field } => Diagnostic {
            execution_id: id,
            reason: DiagnosticReason::NonFinite { field: field.to_string() },
        },
    }
}

/// Commissions are costs (≤ 0). A positive value is interpreted as a fee
/// magnitude: negated, with a diagnostic so the source can be fixed upstream.
fn normalized_commission(execution: &Execution, diagnostics: &mut Vec<Diagnostic>) -> f64 {
    if execution.commission > 0.0 {
        diagnostics.push(Diagnostic {
            execution_id: execution.id.clone(),
            reason: DiagnosticReason::PositiveCommission { original: execution.commission },
        });
        -execution.commission
    } else {
        execution.commission
    }
}
