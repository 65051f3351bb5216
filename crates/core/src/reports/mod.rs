//! Summaries and statistics over a user's transactions.
//!
//! Everything here is a pure function of rows already loaded by the caller.
//! Only completed transactions are counted.

mod period;
mod service;
mod types;

#[cfg(test)]
mod tests;

pub use period::{DateWindow, ReportPeriod};
pub use service::{category_overview, category_stats, summarize};
pub use types::{CategoryShare, CategoryStats, PeriodSummary, UserOverview};
