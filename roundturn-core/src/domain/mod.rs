//! Domain types for the round-turn analytics engine.

pub mod annotation;
pub mod diagnostic;
pub mod execution;
pub mod ids;
pub mod instrument;
pub mod position;
pub mod trade;

pub use annotation::TradeAnnotation;
pub use diagnostic::{Diagnostic, DiagnosticReason};
pub use execution::{Execution, ExecutionError, InstrumentKind};
pub use ids::{ExecutionId, TradeId};
pub use instrument::{Instrument, InstrumentCatalog};
pub use position::OpenPosition;
pub use trade::{Outcome, RoundTurn, RoundTurnTrade, TradeSide};
