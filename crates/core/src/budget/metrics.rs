//! Values derived from a budget's amount, spent figure and window.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Share of `amount` consumed by `spent`, rounded half away from zero.
///
/// Zero when the amount is zero.
#[must_use]
pub fn percentage_used(amount: Decimal, spent: Decimal) -> i64 {
    if amount.is_zero() {
        return 0;
    }
    (spent / amount * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(i64::MAX)
}

/// Derived metrics of one budget as of a reference day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetMetrics {
    /// Unspent amount, never negative.
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining: Decimal,
    /// Whole percent of the amount spent.
    pub percentage_used: i64,
    /// Days between start and end.
    pub total_days: i64,
    /// Days elapsed since start.
    pub days_passed: i64,
    /// Days left until end.
    pub days_remaining: i64,
    /// Pro-rata share of the amount for the elapsed days.
    #[serde(with = "rust_decimal::serde::float")]
    pub expected_spent_by_now: Decimal,
    /// Whether spending is at or below the pro-rata share.
    pub is_on_track: bool,
    /// Spent extrapolated to the whole window.
    #[serde(with = "rust_decimal::serde::float")]
    pub projected_total: Decimal,
    /// Spent per elapsed day.
    #[serde(with = "rust_decimal::serde::float")]
    pub daily_average: Decimal,
    /// Whether spent exceeds the amount.
    pub is_over_budget: bool,
    /// Whether the percentage used reached the alert threshold.
    pub is_near_limit: bool,
}

impl BudgetMetrics {
    /// Computes the metrics for a budget as of `today`.
    ///
    /// A budget whose window is a single day expects its whole amount and
    /// projects exactly what was spent.
    #[must_use]
    pub fn compute(
        amount: Decimal,
        spent: Decimal,
        start: NaiveDate,
        end: NaiveDate,
        alert_threshold: i32,
        today: NaiveDate,
    ) -> Self {
        let total_days = (end - start).num_days().max(0);
        let days_passed = (today - start).num_days().max(0);
        let days_remaining = (end - today).num_days().max(0);
        let divisor = Decimal::from(days_passed.max(1));

        let (expected_spent_by_now, projected_total) = if total_days == 0 {
            (amount, spent)
        } else {
            let total = Decimal::from(total_days);
            (
                amount * Decimal::from(days_passed.min(total_days)) / total,
                spent * total / divisor,
            )
        };

        let percentage_used = percentage_used(amount, spent);

        Self {
            remaining: (amount - spent).max(Decimal::ZERO),
            percentage_used,
            total_days,
            days_passed,
            days_remaining,
            expected_spent_by_now: expected_spent_by_now.round_dp(2),
            is_on_track: spent <= expected_spent_by_now,
            projected_total: projected_total.round_dp(2),
            daily_average: (spent / divisor).round_dp(2),
            is_over_budget: spent > amount,
            is_near_limit: percentage_used >= i64::from(alert_threshold),
        }
    }
}

/// Totals over a user's active budgets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BudgetOverview {
    /// Number of budgets counted.
    pub total_budgets: u64,
    /// Sum of planned amounts.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    /// Sum of spent figures.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spent: Decimal,
    /// Sum of per-budget remaining amounts.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_remaining: Decimal,
    /// Budgets whose spent exceeds their amount.
    pub over_budget_count: u64,
    /// Budgets at or past their alert threshold.
    pub near_limit_count: u64,
    /// Spent over amount across all budgets, whole percent.
    pub overall_percentage: i64,
}

impl BudgetOverview {
    /// Aggregates `(amount, spent, alert_threshold)` triples.
    pub fn from_budgets<I>(budgets: I) -> Self
    where
        I: IntoIterator<Item = (Decimal, Decimal, i32)>,
    {
        let mut overview = budgets
            .into_iter()
            .fold(Self::default(), |mut acc, (amount, spent, threshold)| {
                acc.total_budgets += 1;
                acc.total_amount += amount;
                acc.total_spent += spent;
                acc.total_remaining += (amount - spent).max(Decimal::ZERO);
                if spent > amount {
                    acc.over_budget_count += 1;
                }
                if percentage_used(amount, spent) >= i64::from(threshold) {
                    acc.near_limit_count += 1;
                }
                acc
            });
        overview.overall_percentage = percentage_used(overview.total_amount, overview.total_spent);
        overview
    }
}
