//! Property tests for the filter, aggregation, and grouping invariants.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use roundturn_analytics::{
    daily_buckets, filter_trades, group_trades, Dimension, FilterCriteria, ReportingCalendar,
    TradeSummary,
};
use roundturn_core::domain::{Outcome, RoundTurnTrade, TradeId, TradeSide};

fn outcome_for(net: f64) -> Outcome {
    if net > 0.0 {
        Outcome::Win
    } else if net < 0.0 {
        Outcome::Loss
    } else {
        Outcome::Scratch
    }
}

prop_compose! {
    fn arb_trade(id: u64)(
        symbol in prop::sample::select(vec!["SPY", "QQQ", "ES"]),
        day in 1u32..=28,
        hour in 0u32..24,
        held_minutes in 0i64..300,
        net_cents in -50_000i64..50_000,
        tag_mask in 0u8..8,
    ) -> RoundTurnTrade {
        let tag_names = ["scalp", "news", "gap"];
        let tags: Vec<String> = tag_names
            .iter()
            .enumerate()
            .filter(|(i, _)| tag_mask & (1 << i) != 0)
            .map(|(_, t)| t.to_string())
            .collect();
        let net = net_cents as f64 / 100.0;
        let opened_at = Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap();
        RoundTurnTrade {
            id: TradeId(id),
            account: "acct-1".into(),
            symbol: symbol.into(),
            side: TradeSide::Long,
            opened_at,
            closed_at: opened_at + Duration::minutes(held_minutes),
            entry_price: 10.0,
            exit_price: 11.0,
            quantity: 100.0,
            commission: -1.0,
            gross_proceeds: net + 1.0,
            net_proceeds: net,
            outcome: outcome_for(net),
            approximate: false,
            tags,
            strategy: None,
            risk_unit: None,
            mfe: None,
            execution_ids: vec![],
        }
    }
}

fn arb_trades() -> impl Strategy<Value = Vec<RoundTurnTrade>> {
    prop::collection::vec(any::<()>(), 0..30).prop_flat_map(|v| {
        let n = v.len();
        (0..n as u64).map(|i| arb_trade(i + 1)).collect::<Vec<_>>()
    })
}

fn utc_calendar() -> ReportingCalendar {
    ReportingCalendar::new(chrono_tz::UTC, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
}

fn full_january() -> FilterCriteria {
    FilterCriteria::over_range(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
    )
}

proptest! {
    #[test]
    fn filtering_is_idempotent(trades in arb_trades()) {
        let criteria = full_january();
        let calendar = criteria.validate().unwrap();
        let once = filter_trades(&criteria, &calendar, &trades);
        let twice = filter_trades(&criteria, &calendar, &once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn bucket_net_sums_to_totals_net(trades in arb_trades()) {
        let calendar = utc_calendar();
        let buckets = daily_buckets(&trades, &calendar);
        let totals = TradeSummary::from_trades(&trades);

        let bucket_net: f64 = buckets.iter().map(|b| b.net_proceeds).sum();
        prop_assert!((bucket_net - totals.net_proceeds).abs() < 1e-6);

        let bucket_trades: usize = buckets.iter().map(|b| b.trades).sum();
        prop_assert_eq!(bucket_trades, trades.len());

        if let Some(last) = buckets.last() {
            prop_assert!((last.cumulative_net - totals.net_proceeds).abs() < 1e-6);
        }
    }

    #[test]
    fn partition_dimensions_place_each_trade_exactly_once(trades in arb_trades()) {
        let calendar = utc_calendar();
        let dims = [Dimension::Symbol, Dimension::Duration, Dimension::TimeOfDay];
        let report = group_trades(&trades, &dims, &calendar);

        for dim in &dims {
            let groups = &report[dim.name()];
            let placed: usize = groups.values().map(|g| g.trade_ids.len()).sum();
            prop_assert_eq!(placed, trades.len(), "dimension {}", dim.name());
            for trade in &trades {
                let containing =
                    groups.values().filter(|g| g.trade_ids.contains(&trade.id)).count();
                prop_assert_eq!(containing, 1);
            }
        }
    }

    #[test]
    fn tag_groups_cover_exactly_the_tagged_trades(trades in arb_trades()) {
        let calendar = utc_calendar();
        let report = group_trades(&trades, &[Dimension::Tag], &calendar);
        let groups = &report["tag"];

        for trade in &trades {
            for tag in &trade.tags {
                prop_assert!(groups[tag].trade_ids.contains(&trade.id));
            }
            // A trade appears in exactly as many groups as it has tags.
            let appearances =
                groups.values().filter(|g| g.trade_ids.contains(&trade.id)).count();
            prop_assert_eq!(appearances, trade.tags.len());
        }
    }

    #[test]
    fn profit_factor_is_defined_iff_there_are_losses(trades in arb_trades()) {
        let totals = TradeSummary::from_trades(&trades);
        prop_assert_eq!(totals.profit_factor.is_some(), totals.losses > 0);
        if let Some(pf) = totals.profit_factor {
            prop_assert!(pf.is_finite());
            prop_assert!(pf >= 0.0);
        }
        if let Some(rate) = totals.win_rate {
            prop_assert!((0.0..=1.0).contains(&rate));
        }
    }
}
