//! Filter engine — pure trade selection.

use crate::calendar::ReportingCalendar;
use crate::criteria::{FilterCriteria, TagMatch};
use roundturn_core::domain::RoundTurnTrade;

/// Select the trades matching `criteria`.
///
/// Pure and deterministic: no side effects, input order preserved, empty
/// results are fine. Idempotent — re-filtering a filtered set with the same
/// criteria is a no-op.
pub fn filter_trades(
    criteria: &FilterCriteria,
    calendar: &ReportingCalendar,
    trades: &[RoundTurnTrade],
) -> Vec<RoundTurnTrade> {
    trades.iter().filter(|t| trade_passes(criteria, calendar, t)).cloned().collect()
}

fn trade_passes(
    criteria: &FilterCriteria,
    calendar: &ReportingCalendar,
    trade: &RoundTurnTrade,
) -> bool {
    let close_date = calendar.local_date(trade.closed_at);
    if close_date < criteria.start || close_date >= criteria.end {
        return false;
    }
    if !criteria.accounts.is_empty() && !criteria.accounts.contains(&trade.account) {
        return false;
    }
    if !criteria.sides.is_empty() && !criteria.sides.contains(&trade.side) {
        return false;
    }
    if !criteria.tags.is_empty() {
        let matches = match criteria.tag_match {
            TagMatch::Any => criteria.tags.iter().any(|tag| trade.tags.iter().any(|t| t == tag)),
            TagMatch::All => criteria.tags.iter().all(|tag| trade.tags.iter().any(|t| t == tag)),
        };
        if !matches {
            return false;
        }
    }
    true
}
