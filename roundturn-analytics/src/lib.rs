//! Roundturn Analytics — filtering, aggregation, grouping, profit analysis.
//!
//! This crate builds on `roundturn-core` to provide:
//! - Filter criteria with fail-fast validation and a pure filter engine
//! - Reporting calendar (one fixed UTC offset per pass)
//! - Period aggregation (day / ISO week / month) with cumulative net
//! - Grouping by symbol, tag, duration, and time of day
//! - Profit analysis (expectancy, R-multiples, efficiency, histograms)
//! - The `recompute` pipeline entry point and JSON/CSV artifact export

pub mod aggregate;
pub mod calendar;
pub mod criteria;
pub mod export;
pub mod filter;
pub mod grouping;
pub mod pipeline;
pub mod profit;
pub mod summary;

pub use aggregate::{daily_buckets, rollup, AggregateBucket, Granularity, PeriodKey};
pub use calendar::ReportingCalendar;
pub use criteria::{CriteriaError, FilterCriteria, TagMatch};
pub use export::{export_json, export_trades_csv, import_json, load_artifacts, save_artifacts};
pub use filter::filter_trades;
pub use grouping::{group_trades, Dimension, Group, GroupReport};
pub use pipeline::{
    recompute, AnalyticsBundle, AnalyticsError, ReportOptions, Snapshot, SCHEMA_VERSION,
};
pub use profit::{analyze_profits, Histogram, ProfitAnalysis};
pub use summary::TradeSummary;
