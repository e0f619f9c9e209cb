use serde::{Deserialize, Serialize};

/// Per-trade annotations supplied by an external collaborator, keyed by
/// `TradeId`.
///
/// Tags and strategy drive filtering and grouping; risk unit and MFE feed the
/// profit analysis engine. All fields are optional — an unannotated trade is
/// perfectly valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeAnnotation {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub strategy: Option<String>,
    /// Predefined risk unit (e.g. dollars risked at entry).
    #[serde(default)]
    pub risk_unit: Option<f64>,
    /// Recorded maximum favorable excursion, in proceeds terms.
    #[serde(default)]
    pub mfe: Option<f64>,
}
