//! Storage traits the recalculation services run against.
//!
//! The services in [`crate::balance`] and [`crate::budget`] only see these
//! traits, so the recalculation rules do not depend on a query dialect.
//! Implementations may return a superset of the rows asked for; the
//! calculators re-apply every filter.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use financeflow_shared::AppResult;

use crate::transaction::TransactionRecord;

/// Account persistence needed by balance recalculation.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Returns the immutable opening balance, or `None` if the account does not exist.
    async fn initial_balance(&self, account_id: Uuid) -> AppResult<Option<Decimal>>;

    /// Persists a recomputed balance.
    async fn store_balance(&self, account_id: Uuid, balance: Decimal) -> AppResult<()>;
}

/// Transaction reads needed by the recalculation services.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Completed transactions whose source or destination is `account_id`.
    async fn completed_touching_account(
        &self,
        account_id: Uuid,
    ) -> AppResult<Vec<TransactionRecord>>;

    /// Completed expenses of a user in a category dated within `[start, end]`.
    async fn completed_expenses_in_window(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<TransactionRecord>>;
}

/// What a budget's spent figure is aggregated over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetScope {
    /// Budget ID.
    pub budget_id: Uuid,
    /// Owner.
    pub user_id: Uuid,
    /// Tracked category.
    pub category_id: Uuid,
    /// First day counted.
    pub start_date: NaiveDate,
    /// Last day counted.
    pub end_date: NaiveDate,
}

impl BudgetScope {
    /// Returns true if `date` falls inside the window, both ends inclusive.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Budget persistence needed by spent aggregation.
#[async_trait]
pub trait BudgetRepository: Send + Sync {
    /// Returns the scope of a budget, or `None` if it does not exist.
    async fn budget_scope(&self, budget_id: Uuid) -> AppResult<Option<BudgetScope>>;

    /// Persists a recomputed spent figure.
    async fn store_spent(&self, budget_id: Uuid, spent: Decimal) -> AppResult<()>;
}
