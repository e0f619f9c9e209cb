//! P&L calculator — prices matched round turns into `RoundTurnTrade`s.
//!
//! gross = (weighted exit − weighted entry) × quantity × side sign ×
//! instrument multiplier; net = gross + commissions. A catalog miss falls
//! back to multiplier 1 and flags the trade approximate rather than failing.

use crate::domain::{InstrumentCatalog, Outcome, RoundTurn, RoundTurnTrade};

/// Price a batch of matched round turns against instrument metadata.
pub fn price_round_turns(
    round_turns: &[RoundTurn],
    catalog: &InstrumentCatalog,
) -> Vec<RoundTurnTrade> {
    round_turns.iter().map(|rt| price_round_turn(rt, catalog)).collect()
}

/// Price a single round turn.
pub fn price_round_turn(round_turn: &RoundTurn, catalog: &InstrumentCatalog) -> RoundTurnTrade {
    let (multiplier, approximate) = match catalog.multiplier(&round_turn.symbol) {
        Some(m) => (m, false),
        None => (1.0, true),
    };

    let gross_proceeds = (round_turn.exit_price - round_turn.entry_price)
        * round_turn.quantity
        * round_turn.side.sign()
        * multiplier;
    // Commissions are ≤ 0, so adding them always reduces proceeds.
    let net_proceeds = gross_proceeds + round_turn.commission;

    let outcome = if net_proceeds > 0.0 {
        Outcome::Win
    } else if net_proceeds < 0.0 {
        Outcome::Loss
    } else {
        Outcome::Scratch
    };

    RoundTurnTrade {
        id: round_turn.id,
        account: round_turn.account.clone(),
        symbol: round_turn.symbol.clone(),
        side: round_turn.side,
        opened_at: round_turn.opened_at,
        closed_at: round_turn.closed_at,
        entry_price: round_turn.entry_price,
        exit_price: round_turn.exit_price,
        quantity: round_turn.quantity,
        commission: round_turn.commission,
        gross_proceeds,
        net_proceeds,
        outcome,
        approximate,
        tags: Vec::new(),
        strategy: None,
        risk_unit: None,
        mfe: None,
        execution_ids: round_turn.execution_ids.clone(),
    }
}
