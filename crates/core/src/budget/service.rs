//! Spent aggregation against storage.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use financeflow_shared::AppResult;

use crate::repository::{BudgetRepository, BudgetScope, TransactionRepository};
use crate::transaction::{TransactionKind, TransactionRecord};

fn counts_towards(scope: &BudgetScope, tx: &TransactionRecord) -> bool {
    tx.is_completed()
        && tx.kind == TransactionKind::Expense
        && tx.user_id == scope.user_id
        && tx.category_id == Some(scope.category_id)
        && scope.contains(tx.date)
}

/// Sums the completed expenses that count towards a budget.
///
/// Rows outside the scope's user, category or window are ignored, so the
/// caller may pass a superset.
#[must_use]
pub fn compute_spent<'a, I>(scope: &BudgetScope, txs: I) -> Decimal
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    txs.into_iter()
        .filter(|tx| counts_towards(scope, tx))
        .map(|tx| tx.amount)
        .sum()
}

/// Spending of one day within a budget window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailySpending {
    /// Calendar day.
    pub date: NaiveDate,
    /// Expenses booked that day.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Expenses booked from the start of the window through that day.
    #[serde(with = "rust_decimal::serde::float")]
    pub cumulative: Decimal,
}

/// Per-day totals of the expenses that count towards a budget, oldest first.
///
/// Days without spending are left out.
#[must_use]
pub fn spending_by_day<'a, I>(scope: &BudgetScope, txs: I) -> Vec<DailySpending>
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    let mut per_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for tx in txs.into_iter().filter(|tx| counts_towards(scope, tx)) {
        *per_day.entry(tx.date).or_default() += tx.amount;
    }

    let mut cumulative = Decimal::ZERO;
    per_day
        .into_iter()
        .map(|(date, amount)| {
            cumulative += amount;
            DailySpending {
                date,
                amount,
                cumulative,
            }
        })
        .collect()
}

/// Recomputes and persists budget spent figures.
pub struct BudgetSpentAggregator<'a, B, T> {
    budgets: &'a B,
    transactions: &'a T,
}

impl<'a, B, T> BudgetSpentAggregator<'a, B, T>
where
    B: BudgetRepository,
    T: TransactionRepository,
{
    /// Creates an aggregator over the given repositories.
    pub const fn new(budgets: &'a B, transactions: &'a T) -> Self {
        Self {
            budgets,
            transactions,
        }
    }

    /// Recomputes one budget's spent figure and stores it.
    ///
    /// Returns `None` if the budget does not exist.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn recompute_spent(&self, budget_id: Uuid) -> AppResult<Option<Decimal>> {
        let Some(scope) = self.budgets.budget_scope(budget_id).await? else {
            warn!(budget_id = %budget_id, "Spent recompute skipped: budget not found");
            return Ok(None);
        };

        let txs = self
            .transactions
            .completed_expenses_in_window(
                scope.user_id,
                scope.category_id,
                scope.start_date,
                scope.end_date,
            )
            .await?;
        let spent = compute_spent(&scope, &txs);

        self.budgets.store_spent(budget_id, spent).await?;
        debug!(budget_id = %budget_id, spent = %spent, "Budget spent recomputed");
        Ok(Some(spent))
    }

    /// Recomputes every listed budget, in order.
    ///
    /// # Errors
    ///
    /// Stops at the first repository failure.
    pub async fn recompute_all<I>(&self, budget_ids: I) -> AppResult<()>
    where
        I: IntoIterator<Item = Uuid>,
    {
        for budget_id in budget_ids {
            self.recompute_spent(budget_id).await?;
        }
        Ok(())
    }
}
