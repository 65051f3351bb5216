//! Report data types.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::period::DateWindow;
use crate::category::CategoryKind;

/// Totals of completed transactions within a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    /// Window covered.
    #[serde(flatten)]
    pub window: DateWindow,
    /// Sum of incomes.
    #[serde(with = "rust_decimal::serde::float")]
    pub income: Decimal,
    /// Sum of expenses.
    #[serde(with = "rust_decimal::serde::float")]
    pub expense: Decimal,
    /// Sum of transfers.
    #[serde(with = "rust_decimal::serde::float")]
    pub transfers: Decimal,
    /// Income minus expense.
    #[serde(with = "rust_decimal::serde::float")]
    pub net: Decimal,
    /// Number of transactions counted.
    pub count: u64,
}

/// Activity of one category within a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    /// Category.
    pub category_id: Uuid,
    /// Window covered.
    #[serde(flatten)]
    pub window: DateWindow,
    /// Sum of amounts.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    /// Number of transactions.
    pub count: u64,
    /// Mean amount, zero without transactions.
    #[serde(with = "rust_decimal::serde::float")]
    pub average: Decimal,
}

/// One row of the category overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryShare {
    /// Category.
    pub category_id: Uuid,
    /// Display name.
    pub name: String,
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: CategoryKind,
    /// Sum of amounts.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    /// Number of transactions.
    pub count: u64,
    /// Share of the total of all categories of the same kind, in percent.
    #[serde(with = "rust_decimal::serde::float")]
    pub percentage: Decimal,
}

/// Head counts for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UserOverview {
    /// All users.
    pub total_users: u64,
    /// Users allowed to log in.
    pub active_users: u64,
    /// Users with the admin role.
    pub admin_users: u64,
    /// Users created in the last 30 days.
    pub new_users_last_30_days: u64,
}
