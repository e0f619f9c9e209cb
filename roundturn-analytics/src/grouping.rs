//! Grouping engine — partitions filtered trades along analytical dimensions.
//!
//! Symbol, duration, and time-of-day are true partitions (every trade lands
//! in exactly one group). Tag grouping fans out: a trade contributes to every
//! tag it carries, and untagged trades fall into no tag group. Strategy works
//! the same way with at most one group per trade.

use crate::calendar::ReportingCalendar;
use crate::summary::TradeSummary;
use chrono::Duration;
use roundturn_core::domain::{RoundTurnTrade, TradeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Grouping dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Dimension {
    Symbol,
    Tag,
    Strategy,
    Duration,
    TimeOfDay,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Symbol,
        Dimension::Tag,
        Dimension::Strategy,
        Dimension::Duration,
        Dimension::TimeOfDay,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Dimension::Symbol => "symbol",
            Dimension::Tag => "tag",
            Dimension::Strategy => "strategy",
            Dimension::Duration => "duration",
            Dimension::TimeOfDay => "time_of_day",
        }
    }
}

/// One group: the trades sharing a key along a dimension, plus their summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub dimension: String,
    pub key: String,
    pub trade_ids: Vec<TradeId>,
    pub summary: TradeSummary,
}

/// dimension name → group key → group, deterministically ordered.
pub type GroupReport = BTreeMap<String, BTreeMap<String, Group>>;

/// Partition trades along each requested dimension.
pub fn group_trades(
    trades: &[RoundTurnTrade],
    dimensions: &[Dimension],
    calendar: &ReportingCalendar,
) -> GroupReport {
    let mut report = GroupReport::new();
    for dimension in dimensions {
        let mut members: BTreeMap<String, Vec<&RoundTurnTrade>> = BTreeMap::new();
        for trade in trades {
            for key in keys_for(trade, *dimension, calendar) {
                members.entry(key).or_default().push(trade);
            }
        }
        let groups: BTreeMap<String, Group> = members
            .into_iter()
            .map(|(key, group_trades)| {
                let group = Group {
                    dimension: dimension.name().to_string(),
                    key: key.clone(),
                    trade_ids: group_trades.iter().map(|t| t.id).collect(),
                    summary: TradeSummary::from_trades(group_trades.iter().copied()),
                };
                (key, group)
            })
            .collect();
        report.insert(dimension.name().to_string(), groups);
    }
    report
}

/// Group keys for one trade along one dimension.
///
/// Exactly one key for the partition dimensions; zero or more for tags.
fn keys_for(
    trade: &RoundTurnTrade,
    dimension: Dimension,
    calendar: &ReportingCalendar,
) -> Vec<String> {
    match dimension {
        Dimension::Symbol => vec![trade.symbol.clone()],
        Dimension::Tag => trade.tags.clone(),
        // Like tags, unlabeled trades fall into no strategy group.
        Dimension::Strategy => trade.strategy.iter().cloned().collect(),
        Dimension::Duration => vec![duration_bucket(trade.duration()).to_string()],
        Dimension::TimeOfDay => vec![time_of_day_bucket(calendar.local_time(trade.opened_at))],
    }
}

/// Fixed duration bins; the edges are configuration, not user-tunable.
fn duration_bucket(duration: Duration) -> &'static str {
    let secs = duration.num_seconds();
    if secs < 60 {
        "<1m"
    } else if secs < 5 * 60 {
        "1-5m"
    } else if secs < 30 * 60 {
        "5-30m"
    } else if secs < 2 * 3600 {
        "30m-2h"
    } else {
        ">2h"
    }
}

/// Hourly window over the local entry time, e.g. "09:00-10:00".
fn time_of_day_bucket(local: chrono::NaiveTime) -> String {
    use chrono::Timelike;
    let hour = local.hour();
    format!("{:02}:00-{:02}:00", hour, (hour + 1) % 24)
}
