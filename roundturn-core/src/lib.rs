//! Roundturn Core — domain types, round-turn matching, P&L calculation.
//!
//! This crate contains the pure compute heart of the analytics engine:
//! - Domain types (executions, round-turn trades, open positions, instruments)
//! - Round-turn matcher: per-(account, symbol) fill sequences → closed trades
//!   plus open positions, with data-quality diagnostics
//! - P&L calculator: gross/net proceeds and win/loss/scratch classification
//!
//! Everything here is a pure function over an explicit snapshot. No I/O, no
//! shared mutable state, no knowledge of file formats or rendering.

pub mod domain;
pub mod matcher;
pub mod pnl;

pub use domain::{
    Diagnostic, DiagnosticReason, Execution, ExecutionError, ExecutionId, Instrument,
    InstrumentCatalog, InstrumentKind, OpenPosition, Outcome, RoundTurn, RoundTurnTrade, TradeId,
    TradeAnnotation, TradeSide,
};
pub use matcher::{match_executions, MatchOutcome};
pub use pnl::{price_round_turn, price_round_turns};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: all core domain types are Send + Sync, so result
    /// bundles can be handed across threads by callers.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Execution>();
        require_sync::<Execution>();
        require_send::<RoundTurn>();
        require_sync::<RoundTurn>();
        require_send::<RoundTurnTrade>();
        require_sync::<RoundTurnTrade>();
        require_send::<OpenPosition>();
        require_sync::<OpenPosition>();
        require_send::<Instrument>();
        require_sync::<Instrument>();
        require_send::<InstrumentCatalog>();
        require_sync::<InstrumentCatalog>();
        require_send::<TradeAnnotation>();
        require_sync::<TradeAnnotation>();
        require_send::<Diagnostic>();
        require_sync::<Diagnostic>();
        require_send::<MatchOutcome>();
        require_sync::<MatchOutcome>();
    }
}
