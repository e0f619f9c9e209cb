//! Profit analysis — expectancy, R-multiples, trade efficiency.
//!
//! Distributions are built only from trades carrying the relevant annotation.
//! A trade without a risk unit simply does not appear in the R-multiple
//! distribution; it is never coerced to zero R.

use crate::summary::TradeSummary;
use roundturn_core::domain::RoundTurnTrade;
use serde::{Deserialize, Serialize};

/// Fixed-edge histogram with explicit underflow/overflow counts.
///
/// `counts[i]` covers the half-open interval `[edges[i], edges[i + 1])`.
/// Produced for external rendering; this crate never draws anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
    pub underflow: usize,
    pub overflow: usize,
}

impl Histogram {
    /// Histogram over `values` with the given bin edges.
    ///
    /// Edges must be strictly increasing with at least two entries.
    pub fn from_values(edges: &[f64], values: impl IntoIterator<Item = f64>) -> Self {
        debug_assert!(edges.len() >= 2);
        debug_assert!(edges.windows(2).all(|w| w[0] < w[1]));
        let mut histogram = Self {
            edges: edges.to_vec(),
            counts: vec![0; edges.len() - 1],
            underflow: 0,
            overflow: 0,
        };
        for value in values {
            histogram.add(value);
        }
        histogram
    }

    fn add(&mut self, value: f64) {
        if value < self.edges[0] {
            self.underflow += 1;
            return;
        }
        if value >= *self.edges.last().expect("edges are non-empty") {
            self.overflow += 1;
            return;
        }
        let bin = self.edges.windows(2).position(|w| value >= w[0] && value < w[1]);
        if let Some(bin) = bin {
            self.counts[bin] += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum::<usize>() + self.underflow + self.overflow
    }
}

/// Profit analysis over one filtered trade set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitAnalysis {
    /// win rate × average win − loss rate × average loss, over decisive
    /// trades only. `None` when there are no decisive trades.
    pub expectancy: Option<f64>,
    /// Net proceeds per trade, for the P&L distribution.
    pub net_histogram: Histogram,
    /// R-multiples (net / risk unit) for trades annotated with a risk unit.
    pub r_multiples: Vec<f64>,
    pub r_histogram: Histogram,
    /// Efficiency (net / recorded MFE) for trades with a nonzero MFE.
    /// Not clamped; values outside [-1, 1] are legal.
    pub efficiencies: Vec<f64>,
    pub efficiency_histogram: Histogram,
}

/// Default bin edges for the net-P&L distribution, in account currency.
const NET_EDGES: [f64; 9] = [-1000.0, -500.0, -250.0, -100.0, 0.0, 100.0, 250.0, 500.0, 1000.0];

/// Default bin edges for the R-multiple distribution.
const R_EDGES: [f64; 9] = [-3.0, -2.0, -1.0, -0.5, 0.0, 0.5, 1.0, 2.0, 3.0];

/// Default bin edges for the efficiency distribution. Spans past ±1 so
/// unclamped values land in real bins rather than the overflow counters.
const EFFICIENCY_EDGES: [f64; 10] =
    [-2.0, -1.0, -0.5, 0.0, 0.25, 0.5, 0.75, 1.0, 1.5, 2.0];

/// Build the profit analysis for a filtered trade set.
pub fn analyze_profits(trades: &[RoundTurnTrade]) -> ProfitAnalysis {
    let summary = TradeSummary::from_trades(trades);
    let r_multiples: Vec<f64> = trades.iter().filter_map(|t| t.r_multiple()).collect();
    let efficiencies: Vec<f64> = trades.iter().filter_map(|t| t.efficiency()).collect();

    ProfitAnalysis {
        expectancy: expectancy(&summary),
        net_histogram: Histogram::from_values(&NET_EDGES, trades.iter().map(|t| t.net_proceeds)),
        r_histogram: Histogram::from_values(&R_EDGES, r_multiples.iter().copied()),
        r_multiples,
        efficiency_histogram: Histogram::from_values(
            &EFFICIENCY_EDGES,
            efficiencies.iter().copied(),
        ),
        efficiencies,
    }
}

/// Expected net per decisive trade.
fn expectancy(summary: &TradeSummary) -> Option<f64> {
    let win_rate = summary.win_rate?;
    let loss_rate = 1.0 - win_rate;
    let average_win = summary.average_win.unwrap_or(0.0);
    let average_loss = summary.average_loss.unwrap_or(0.0);
    Some(win_rate * average_win - loss_rate * average_loss)
}
