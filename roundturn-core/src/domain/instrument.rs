//! Instrument metadata supplied by an external collaborator.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-symbol contract metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: String,
    /// Point value multiplier (e.g. 50 for ES). 1 for cash equities.
    pub multiplier: f64,
    pub tick_size: f64,
    pub currency: String,
}

impl Instrument {
    pub fn new(
        symbol: impl Into<String>,
        multiplier: f64,
        tick_size: f64,
        currency: impl Into<String>,
    ) -> Self {
        Self { symbol: symbol.into(), multiplier, tick_size, currency: currency.into() }
    }
}

/// Symbol → instrument lookup.
///
/// A missing symbol is not an error: P&L falls back to multiplier 1 and the
/// resulting trade is flagged approximate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstrumentCatalog {
    by_symbol: HashMap<String, Instrument>,
}

impl InstrumentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, instrument: Instrument) {
        self.by_symbol.insert(instrument.symbol.clone(), instrument);
    }

    pub fn get(&self, symbol: &str) -> Option<&Instrument> {
        self.by_symbol.get(symbol)
    }

    /// Multiplier for a symbol, `None` on a catalog miss.
    pub fn multiplier(&self, symbol: &str) -> Option<f64> {
        self.by_symbol.get(symbol).map(|i| i.multiplier)
    }

    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }
}

impl FromIterator<Instrument> for InstrumentCatalog {
    fn from_iter<T: IntoIterator<Item = Instrument>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for instrument in iter {
            catalog.insert(instrument);
        }
        catalog
    }
}
