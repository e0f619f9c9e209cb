//! Filter criteria — the user's trade selection, validated up front.

use crate::calendar::ReportingCalendar;
use chrono::NaiveDate;
use roundturn_core::domain::TradeSide;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// How a multi-tag criteria set matches a trade's tags.
///
/// Observed journal behavior is ambiguous between OR and AND, so both are
/// exposed explicitly; `Any` (OR) is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TagMatch {
    /// At least one criteria tag appears on the trade (OR semantics).
    #[default]
    Any,
    /// Every criteria tag appears on the trade (AND semantics, opt-in).
    All,
}

/// Trade selection criteria for one analytics pass.
///
/// Empty sets mean "no restriction". The date range is half-open
/// [start, end) over local close dates in the reporting timezone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// First local close date included.
    pub start: NaiveDate,
    /// First local close date excluded.
    pub end: NaiveDate,
    #[serde(default)]
    pub accounts: BTreeSet<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub sides: BTreeSet<TradeSide>,
    #[serde(default)]
    pub tag_match: TagMatch,
    /// IANA timezone name, e.g. "America/New_York".
    #[serde(default = "default_timezone")]
    pub reporting_timezone: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl FilterCriteria {
    /// Unrestricted criteria over a date range, reported in UTC.
    pub fn over_range(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            accounts: BTreeSet::new(),
            tags: BTreeSet::new(),
            sides: BTreeSet::new(),
            tag_match: TagMatch::Any,
            reporting_timezone: default_timezone(),
        }
    }

    /// Fail-fast contract check: inverted ranges and unknown timezones are
    /// caller errors, not data-quality diagnostics.
    ///
    /// On success, returns the `ReportingCalendar` for the pass, anchored at
    /// the range start.
    pub fn validate(&self) -> Result<ReportingCalendar, CriteriaError> {
        if self.start > self.end {
            return Err(CriteriaError::InvertedDateRange { start: self.start, end: self.end });
        }
        let tz: chrono_tz::Tz = self
            .reporting_timezone
            .parse()
            .map_err(|_| CriteriaError::UnknownTimezone(self.reporting_timezone.clone()))?;
        Ok(ReportingCalendar::new(tz, self.start))
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CriteriaError {
    #[error("date range start {start} is after end {end}")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },

    #[error("unknown reporting timezone '{0}'")]
    UnknownTimezone(String),
}
