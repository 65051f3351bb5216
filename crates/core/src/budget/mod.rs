//! Budget spent aggregation and derived metrics.
//!
//! A budget's `spent` is the sum of completed expenses in its category and
//! window. It is stored, but always recomputed before it is read.

mod metrics;
mod service;
mod types;


pub use metrics::{BudgetMetrics, BudgetOverview, percentage_used};
pub use service::{BudgetSpentAggregator, DailySpending, compute_spent, spending_by_day};
pub use types::{BudgetPeriod, DEFAULT_ALERT_THRESHOLD, validate_budget};
