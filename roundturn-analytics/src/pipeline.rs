//! Recompute pipeline — the single command-style entry point.
//!
//! Match, price, annotate, filter, aggregate, group, analyze. The returned
//! bundle is a whole-replacement value; callers swap it in atomically rather
//! than patching a previous result.

use crate::aggregate::{daily_buckets, rollup, AggregateBucket, Granularity};
use crate::criteria::{CriteriaError, FilterCriteria};
use crate::filter::filter_trades;
use crate::grouping::{group_trades, Dimension, GroupReport};
use crate::profit::{analyze_profits, ProfitAnalysis};
use crate::summary::TradeSummary;
use roundturn_core::domain::{
    Diagnostic, Execution, InstrumentCatalog, OpenPosition, RoundTurnTrade, TradeAnnotation,
    TradeId,
};
use roundturn_core::matcher::match_executions;
use roundturn_core::pnl::price_round_turns;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Everything one analytics pass reads, taken as a value at call time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub executions: Vec<Execution>,
    #[serde(default)]
    pub instruments: InstrumentCatalog,
    /// User annotations keyed by deterministic trade id.
    #[serde(default)]
    pub annotations: HashMap<TradeId, TradeAnnotation>,
}

/// Report shape: period granularity and which grouping dimensions to build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportOptions {
    #[serde(default)]
    pub granularity: Granularity,
    #[serde(default = "default_dimensions")]
    pub dimensions: Vec<Dimension>,
}

fn default_dimensions() -> Vec<Dimension> {
    Dimension::ALL.to_vec()
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { granularity: Granularity::Day, dimensions: default_dimensions() }
    }
}

/// Version stamp on persisted bundles. Bump on breaking artifact changes.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of one pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsBundle {
    pub schema_version: u32,
    /// Criteria echoed back so an exported bundle is self-describing.
    pub criteria: FilterCriteria,
    pub trades: Vec<RoundTurnTrade>,
    /// Open positions from the whole snapshot; the filter does not apply to
    /// them and they never enter closed-trade aggregates.
    pub open_positions: Vec<OpenPosition>,
    pub totals: TradeSummary,
    pub buckets: Vec<AggregateBucket>,
    pub groups: GroupReport,
    pub profit: ProfitAnalysis,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error(transparent)]
    Criteria(#[from] CriteriaError),
}

/// Run one full analytics pass over `snapshot`.
///
/// Criteria violations fail the call; data-quality issues are absorbed into
/// `AnalyticsBundle::diagnostics`.
pub fn recompute(
    snapshot: &Snapshot,
    criteria: &FilterCriteria,
    options: &ReportOptions,
) -> Result<AnalyticsBundle, AnalyticsError> {
    let calendar = criteria.validate()?;

    let outcome = match_executions(&snapshot.executions);
    if !outcome.diagnostics.is_empty() {
        warn!(count = outcome.diagnostics.len(), "absorbed data-quality diagnostics");
    }

    let mut trades = price_round_turns(&outcome.round_turns, &snapshot.instruments);
    apply_annotations(&mut trades, &snapshot.annotations);

    let trades = filter_trades(criteria, &calendar, &trades);
    debug!(
        matched = outcome.round_turns.len(),
        filtered = trades.len(),
        open = outcome.open_positions.len(),
        "recompute pass"
    );

    let daily = daily_buckets(&trades, &calendar);
    let buckets = rollup(&daily, options.granularity);

    Ok(AnalyticsBundle {
        schema_version: SCHEMA_VERSION,
        criteria: criteria.clone(),
        totals: TradeSummary::from_trades(&trades),
        buckets,
        groups: group_trades(&trades, &options.dimensions, &calendar),
        profit: analyze_profits(&trades),
        trades,
        open_positions: outcome.open_positions,
        diagnostics: outcome.diagnostics,
    })
}

/// Copy user annotations onto the priced trades they refer to.
///
/// Annotations for ids not present in this pass are ignored; ids are
/// deterministic, so they re-attach on the next pass that includes the trade.
fn apply_annotations(trades: &mut [RoundTurnTrade], annotations: &HashMap<TradeId, TradeAnnotation>) {
    for trade in trades {
        if let Some(annotation) = annotations.get(&trade.id) {
            trade.tags = annotation.tags.clone();
            trade.strategy = annotation.strategy.clone();
            trade.risk_unit = annotation.risk_unit;
            trade.mfe = annotation.mfe;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use roundturn_core::domain::{ExecutionId, InstrumentKind};

    fn exec(id: &str, qty: f64, price: f64, minute: u32) -> Execution {
        Execution::new(
            ExecutionId::new(id),
            "acct-1",
            "SPY",
            InstrumentKind::Equity,
            qty,
            price,
            -0.5,
            Utc.with_ymd_and_hms(2024, 1, 5, 14, minute, 0).unwrap(),
            "USD",
        )
        .unwrap()
    }

    fn january() -> FilterCriteria {
        FilterCriteria::over_range(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        )
    }

    #[test]
    fn recompute_builds_a_full_bundle() {
        let snapshot = Snapshot {
            executions: vec![exec("e1", 100.0, 10.0, 0), exec("e2", -100.0, 11.0, 5)],
            ..Default::default()
        };
        let bundle = recompute(&snapshot, &january(), &ReportOptions::default()).unwrap();

        assert_eq!(bundle.trades.len(), 1);
        assert!((bundle.totals.net_proceeds - 99.0).abs() < 1e-10);
        assert_eq!(bundle.buckets.len(), 1);
        assert!(bundle.groups.contains_key("symbol"));
        assert!(bundle.open_positions.is_empty());
        assert!(bundle.diagnostics.is_empty());
    }

    #[test]
    fn annotations_attach_by_trade_id() {
        let mut annotations = HashMap::new();
        annotations.insert(
            TradeId(1),
            TradeAnnotation {
                tags: vec!["scalp".into()],
                strategy: Some("orb".into()),
                risk_unit: Some(50.0),
                mfe: None,
            },
        );
        let snapshot = Snapshot {
            executions: vec![exec("e1", 100.0, 10.0, 0), exec("e2", -100.0, 11.0, 5)],
            annotations,
            ..Default::default()
        };
        let bundle = recompute(&snapshot, &january(), &ReportOptions::default()).unwrap();

        let trade = &bundle.trades[0];
        assert_eq!(trade.tags, vec!["scalp".to_string()]);
        assert_eq!(trade.strategy.as_deref(), Some("orb"));
        assert_eq!(bundle.profit.r_multiples.len(), 1);
        assert!(bundle.groups["tag"].contains_key("scalp"));
    }

    #[test]
    fn empty_date_range_yields_empty_results_not_zero_buckets() {
        let snapshot = Snapshot {
            executions: vec![exec("e1", 100.0, 10.0, 0), exec("e2", -100.0, 11.0, 5)],
            ..Default::default()
        };
        // March range; the only trade closed in January.
        let criteria = FilterCriteria::over_range(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        );
        let bundle = recompute(&snapshot, &criteria, &ReportOptions::default()).unwrap();

        assert!(bundle.trades.is_empty());
        assert!(bundle.buckets.is_empty());
        assert_eq!(bundle.totals.trades, 0);
        assert_eq!(bundle.totals.win_rate, None);
        assert!(bundle.groups["symbol"].is_empty());
    }

    #[test]
    fn inverted_range_fails_the_call() {
        let snapshot = Snapshot::default();
        let criteria = FilterCriteria::over_range(
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        let err = recompute(&snapshot, &criteria, &ReportOptions::default()).unwrap_err();
        assert!(matches!(err, AnalyticsError::Criteria(CriteriaError::InvertedDateRange { .. })));
    }

    #[test]
    fn open_positions_survive_filtering() {
        // Buy without a matching sell: one open position, zero closed trades.
        let snapshot = Snapshot {
            executions: vec![exec("e1", 100.0, 10.0, 0)],
            ..Default::default()
        };
        let bundle = recompute(&snapshot, &january(), &ReportOptions::default()).unwrap();
        assert!(bundle.trades.is_empty());
        assert_eq!(bundle.open_positions.len(), 1);
    }
}
