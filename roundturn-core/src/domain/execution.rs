//! Execution — one fill of an order, the atomic unit of raw trade data.

use super::ids::ExecutionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Instrument class of an execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstrumentKind {
    Equity,
    Future,
    Forex,
    Crypto,
}

/// A single fill, immutable once ingested.
///
/// `quantity` is signed: positive = buy, negative = sell. `commission` is
/// conventionally ≤ 0 (a cost). Snapshots deserialized from external sources
/// bypass [`Execution::new`], so the matcher re-validates every execution and
/// absorbs malformed ones as diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    pub id: ExecutionId,
    pub account: String,
    pub symbol: String,
    pub kind: InstrumentKind,
    pub quantity: f64,
    pub price: f64,
    pub commission: f64,
    pub timestamp: DateTime<Utc>,
    pub currency: String,
}

impl Execution {
    /// Validating constructor. Rejects zero or non-finite quantity and
    /// non-finite price/commission.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ExecutionId,
        account: impl Into<String>,
        symbol: impl Into<String>,
        kind: InstrumentKind,
        quantity: f64,
        price: f64,
        commission: f64,
        timestamp: DateTime<Utc>,
        currency: impl Into<String>,
    ) -> Result<Self, ExecutionError> {
        let execution = Self {
            id,
            account: account.into(),
            symbol: symbol.into(),
            kind,
            quantity,
            price,
            commission,
            timestamp,
            currency: currency.into(),
        };
        execution.validate()?;
        Ok(execution)
    }

    /// Re-check the construction invariants (used on deserialized snapshots).
    pub fn validate(&self) -> Result<(), ExecutionError> {
        if self.quantity == 0.0 {
            return Err(ExecutionError::ZeroQuantity { id: self.id.clone() });
        }
        if !self.quantity.is_finite() {
            return Err(ExecutionError::NonFinite { id: self.id.clone(), field: "quantity" });
        }
        if !self.price.is_finite() {
            return Err(ExecutionError::NonFinite { id: self.id.clone(), field: "price" });
        }
        if !self.commission.is_finite() {
            return Err(ExecutionError::NonFinite { id: self.id.clone(), field: "commission" });
        }
        Ok(())
    }

    pub fn is_buy(&self) -> bool {
        self.quantity > 0.0
    }

    /// Absolute fill size.
    pub fn size(&self) -> f64 {
        self.quantity.abs()
    }
}

#[derive(Debug, Clone, Error)]
pub enum ExecutionError {
    #[error("execution {id}: quantity must be non-zero")]
    ZeroQuantity { id: ExecutionId },

    #[error("execution {id}: {field} must be finite")]
    NonFinite { id: ExecutionId, field: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 14, 30, 0).unwrap()
    }

    fn sample() -> Result<Execution, ExecutionError> {
        Execution::new(
            ExecutionId::new("e1"),
            "acct-1",
            "ES",
            InstrumentKind::Future,
            2.0,
            4500.25,
            -1.50,
            ts(),
            "USD",
        )
    }

    #[test]
    fn valid_execution_constructs() {
        let e = sample().unwrap();
        assert!(e.is_buy());
        assert_eq!(e.size(), 2.0);
    }

    #[test]
    fn zero_quantity_rejected() {
        let err = Execution::new(
            ExecutionId::new("e2"),
            "acct-1",
            "ES",
            InstrumentKind::Future,
            0.0,
            4500.25,
            -1.50,
            ts(),
            "USD",
        )
        .unwrap_err();
        assert!(matches!(err, ExecutionError::ZeroQuantity { .. }));
    }

    #[test]
    fn nan_price_rejected() {
        let err = Execution::new(
            ExecutionId::new("e3"),
            "acct-1",
            "ES",
            InstrumentKind::Future,
            1.0,
            f64::NAN,
            0.0,
            ts(),
            "USD",
        )
        .unwrap_err();
        assert!(matches!(err, ExecutionError::NonFinite { field: "price", .. }));
    }

    #[test]
    fn serialization_roundtrip() {
        let e = sample().unwrap();
        let json = serde_json::to_string(&e).unwrap();
        let deser: Execution = serde_json::from_str(&json).unwrap();
        assert_eq!(e, deser);
    }
}
