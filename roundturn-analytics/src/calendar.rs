//! Reporting calendar — timezone math with one fixed offset per pass.
//!
//! Week/month boundaries must not shift mid-span when a DST transition falls
//! inside the reporting range. The convention here: capture the UTC offset of
//! the range start in the reporting timezone once, at construction, and use
//! that offset for every local-date and local-time conversion in the pass.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

/// Timezone context for one analytics pass.
///
/// Derived from validated `FilterCriteria` on every pass and never persisted;
/// exported bundles carry the criteria instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingCalendar {
    tz: Tz,
    /// Offset captured at construction; never recomputed mid-span.
    offset: FixedOffset,
}

impl ReportingCalendar {
    /// Build a calendar anchored at midnight of `anchor` in `tz`.
    ///
    /// An ambiguous local midnight (DST fall-back) resolves to the earlier
    /// offset; a skipped one (spring-forward) falls back to interpreting the
    /// anchor as UTC.
    pub fn new(tz: Tz, anchor: NaiveDate) -> Self {
        let midnight = anchor.and_hms_opt(0, 0, 0).expect("midnight is always valid");
        let offset = tz
            .from_local_datetime(&midnight)
            .earliest()
            .map(|dt| dt.offset().fix())
            .unwrap_or_else(|| tz.from_utc_datetime(&midnight).offset().fix());
        Self { tz, offset }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Calendar date of a UTC instant under the captured offset.
    pub fn local_date(&self, ts: DateTime<Utc>) -> NaiveDate {
        ts.with_timezone(&self.offset).date_naive()
    }

    /// Wall-clock time of a UTC instant under the captured offset.
    pub fn local_time(&self, ts: DateTime<Utc>) -> NaiveTime {
        ts.with_timezone(&self.offset).time()
    }
}
