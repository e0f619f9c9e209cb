//! Data-quality diagnostics — absorbed and reported, never fatal.

use super::ids::ExecutionId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an execution was excluded or adjusted during matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticReason {
    /// Quantity was exactly zero; the fill carries no position change.
    ZeroQuantity,
    /// A numeric field was NaN or infinite.
    NonFinite { field: String },
    /// Commission arrived positive; it was interpreted as a fee magnitude
    /// and negated so the commission ≤ 0 invariant holds downstream.
    PositiveCommission { original: f64 },
}

/// One data-quality finding tied to an execution.
///
/// Diagnostics distinguish data-quality issues (absorbed, reported here) from
/// caller contract violations (which fail the call).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub execution_id: ExecutionId,
    pub reason: DiagnosticReason,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            DiagnosticReason::ZeroQuantity => {
                write!(f, "execution {}: zero quantity, excluded", self.execution_id)
            }
            DiagnosticReason::NonFinite { field } => {
                write!(f, "execution {}: non-finite {}, excluded", self.execution_id, field)
            }
            DiagnosticReason::PositiveCommission { original } => {
                write!(
                    f,
                    "execution {}: positive commission {} negated",
                    self.execution_id, original
                )
            }
        }
    }
}
