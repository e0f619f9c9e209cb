//! Aggregator — daily buckets, week/month rollups, cumulative totals.
//!
//! Buckets exist only for periods that actually contain trades: "no data" is
//! distinguishable from "zero P&L". Cumulative net is a full prefix-sum
//! recomputation over ordered buckets on every build, never patched.

use crate::calendar::ReportingCalendar;
use chrono::{Datelike, Duration, NaiveDate};
use roundturn_core::domain::{Outcome, RoundTurnTrade};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reporting period granularity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Granularity {
    #[default]
    Day,
    Week,
    Month,
}

/// Key of one aggregate period.
///
/// Ordered by period start date, so a sorted bucket list is in calendar
/// order regardless of granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "granularity", content = "start", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodKey {
    Day(NaiveDate),
    /// ISO week, keyed by its Monday.
    Week(NaiveDate),
    /// Calendar month, keyed by its first day.
    Month(NaiveDate),
}

impl PeriodKey {
    pub fn start(&self) -> NaiveDate {
        match self {
            PeriodKey::Day(d) | PeriodKey::Week(d) | PeriodKey::Month(d) => *d,
        }
    }

    /// Period containing `date` at the given granularity.
    pub fn containing(date: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Day => PeriodKey::Day(date),
            Granularity::Week => {
                let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
                PeriodKey::Week(monday)
            }
            Granularity::Month => {
                PeriodKey::Month(date.with_day(1).expect("day 1 exists in every month"))
            }
        }
    }

    pub fn label(&self) -> String {
        match self {
            PeriodKey::Day(d) => d.format("%Y-%m-%d").to_string(),
            PeriodKey::Week(d) => format!("{}-W{:02}", d.iso_week().year(), d.iso_week().week()),
            PeriodKey::Month(d) => d.format("%Y-%m").to_string(),
        }
    }
}

/// One period's aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateBucket {
    pub period: PeriodKey,
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub scratches: usize,
    pub gross_proceeds: f64,
    pub commission: f64,
    pub net_proceeds: f64,
    /// Prefix sum of `net_proceeds` across buckets ordered by period start.
    pub cumulative_net: f64,
}

impl AggregateBucket {
    fn empty(period: PeriodKey) -> Self {
        Self {
            period,
            trades: 0,
            wins: 0,
            losses: 0,
            scratches: 0,
            gross_proceeds: 0.0,
            commission: 0.0,
            net_proceeds: 0.0,
            cumulative_net: 0.0,
        }
    }

    fn absorb_trade(&mut self, trade: &RoundTurnTrade) {
        self.trades += 1;
        match trade.outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Scratch => self.scratches += 1,
        }
        self.gross_proceeds += trade.gross_proceeds;
        self.commission += trade.commission;
        self.net_proceeds += trade.net_proceeds;
    }

    fn absorb_bucket(&mut self, other: &AggregateBucket) {
        self.trades += other.trades;
        self.wins += other.wins;
        self.losses += other.losses;
        self.scratches += other.scratches;
        self.gross_proceeds += other.gross_proceeds;
        self.commission += other.commission;
        self.net_proceeds += other.net_proceeds;
    }
}

/// Bucket trades by local close date. One bucket per day that has trades.
pub fn daily_buckets(trades: &[RoundTurnTrade], calendar: &ReportingCalendar) -> Vec<AggregateBucket> {
    let mut by_day: BTreeMap<NaiveDate, AggregateBucket> = BTreeMap::new();
    for trade in trades {
        let date = calendar.local_date(trade.closed_at);
        by_day
            .entry(date)
            .or_insert_with(|| AggregateBucket::empty(PeriodKey::Day(date)))
            .absorb_trade(trade);
    }
    with_cumulative(by_day.into_values().collect())
}

/// Re-sum daily buckets into a coarser granularity.
///
/// Period boundaries come from the calendar dates already assigned to the
/// daily buckets — the calendar's fixed offset was captured once at
/// construction, so a DST transition inside the span cannot move a trade
/// across a week or month boundary between calls.
pub fn rollup(daily: &[AggregateBucket], granularity: Granularity) -> Vec<AggregateBucket> {
    if granularity == Granularity::Day {
        return with_cumulative(daily.to_vec());
    }
    let mut by_period: BTreeMap<PeriodKey, AggregateBucket> = BTreeMap::new();
    for bucket in daily {
        let key = PeriodKey::containing(bucket.period.start(), granularity);
        by_period
            .entry(key)
            .or_insert_with(|| AggregateBucket::empty(key))
            .absorb_bucket(bucket);
    }
    with_cumulative(by_period.into_values().collect())
}

/// Full cumulative recomputation over buckets ordered by period start.
fn with_cumulative(mut buckets: Vec<AggregateBucket>) -> Vec<AggregateBucket> {
    buckets.sort_by_key(|b| b.period);
    let mut running = 0.0;
    for bucket in &mut buckets {
        running += bucket.net_proceeds;
        bucket.cumulative_net = running;
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use roundturn_core::domain::{TradeId, TradeSide};

    fn calendar() -> ReportingCalendar {
        ReportingCalendar::new(chrono_tz::UTC, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    }

    fn trade(id: u64, month: u32, day: u32, net: f64) -> RoundTurnTrade {
        RoundTurnTrade {
            id: TradeId(id),
            account: "a".into(),
            symbol: "X".into(),
            side: TradeSide::Long,
            opened_at: Utc.with_ymd_and_hms(2024, month, day, 14, 0, 0).unwrap(),
            closed_at: Utc.with_ymd_and_hms(2024, month, day, 15, 0, 0).unwrap(),
            entry_price: 10.0,
            exit_price: 11.0,
            quantity: 100.0,
            commission: -1.0,
            gross_proceeds: net + 1.0,
            net_proceeds: net,
            outcome: if net > 0.0 {
                Outcome::Win
            } else if net < 0.0 {
                Outcome::Loss
            } else {
                Outcome::Scratch
            },
            approximate: false,
            tags: vec![],
            strategy: None,
            risk_unit: None,
            mfe: None,
            execution_ids: vec![],
        }
    }

    #[test]
    fn no_empty_buckets_are_synthesized() {
        // Trades on Jan 2 and Jan 5 only: exactly two buckets, no Jan 3/4.
        let trades = vec![trade(1, 1, 2, 100.0), trade(2, 1, 5, -50.0)];
        let buckets = daily_buckets(&trades, &calendar());
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].period, PeriodKey::Day(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()));
        assert_eq!(buckets[1].period, PeriodKey::Day(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()));
    }

    #[test]
    fn cumulative_is_a_prefix_sum() {
        let trades = vec![trade(1, 1, 2, 100.0), trade(2, 1, 3, -30.0), trade(3, 1, 4, 10.0)];
        let buckets = daily_buckets(&trades, &calendar());
        let cumulative: Vec<f64> = buckets.iter().map(|b| b.cumulative_net).collect();
        assert!((cumulative[0] - 100.0).abs() < 1e-10);
        assert!((cumulative[1] - 70.0).abs() < 1e-10);
        assert!((cumulative[2] - 80.0).abs() < 1e-10);
    }

    #[test]
    fn same_day_trades_share_a_bucket() {
        let trades = vec![trade(1, 1, 2, 100.0), trade(2, 1, 2, -30.0), trade(3, 1, 2, 0.0)];
        let buckets = daily_buckets(&trades, &calendar());
        assert_eq!(buckets.len(), 1);
        let b = &buckets[0];
        assert_eq!((b.trades, b.wins, b.losses, b.scratches), (3, 1, 1, 1));
        assert!((b.net_proceeds - 70.0).abs() < 1e-10);
    }

    #[test]
    fn weekly_rollup_uses_iso_weeks() {
        // 2024-01-05 is a Friday, 2024-01-08 a Monday: two ISO weeks.
        let trades = vec![trade(1, 1, 5, 100.0), trade(2, 1, 8, 50.0), trade(3, 1, 9, -20.0)];
        let daily = daily_buckets(&trades, &calendar());
        let weekly = rollup(&daily, Granularity::Week);

        assert_eq!(weekly.len(), 2);
        assert_eq!(weekly[0].period, PeriodKey::Week(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
        assert_eq!(weekly[1].period, PeriodKey::Week(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()));
        assert_eq!(weekly[1].trades, 2);
        assert!((weekly[1].net_proceeds - 30.0).abs() < 1e-10);
        // Cumulative recomputed after the re-sum.
        assert!((weekly[1].cumulative_net - 130.0).abs() < 1e-10);
    }

    #[test]
    fn monthly_rollup_keys_by_first_of_month() {
        let trades = vec![trade(1, 1, 31, 100.0), trade(2, 2, 1, 50.0)];
        let daily = daily_buckets(&trades, &calendar());
        let monthly = rollup(&daily, Granularity::Month);

        assert_eq!(monthly.len(), 2);
        assert_eq!(
            monthly[0].period,
            PeriodKey::Month(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        );
        assert_eq!(
            monthly[1].period,
            PeriodKey::Month(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())
        );
    }

    #[test]
    fn bucket_sum_matches_trade_sum() {
        let trades: Vec<RoundTurnTrade> =
            (1..=10).map(|i| trade(i, 1, (i % 5 + 2) as u32, i as f64 * 10.0 - 30.0)).collect();
        let buckets = daily_buckets(&trades, &calendar());
        let bucket_net: f64 = buckets.iter().map(|b| b.net_proceeds).sum();
        let trade_net: f64 = trades.iter().map(|t| t.net_proceeds).sum();
        assert!((bucket_net - trade_net).abs() < 1e-9);
        assert!((buckets.last().unwrap().cumulative_net - trade_net).abs() < 1e-9);
    }

    #[test]
    fn period_labels() {
        assert_eq!(
            PeriodKey::Day(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()).label(),
            "2024-01-05"
        );
        assert_eq!(
            PeriodKey::Week(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()).label(),
            "2024-W02"
        );
        assert_eq!(
            PeriodKey::Month(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()).label(),
            "2024-02"
        );
    }
}
