//! Balance recalculation against storage.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use tracing::{debug, warn};
use uuid::Uuid;

use financeflow_shared::AppResult;

use super::calculator::compute_balance;
use crate::repository::{AccountRepository, TransactionRepository};
use crate::transaction::TransactionRecord;

/// Recomputes and persists account balances.
pub struct BalanceRecalculator<'a, A, T> {
    accounts: &'a A,
    transactions: &'a T,
}

impl<'a, A, T> BalanceRecalculator<'a, A, T>
where
    A: AccountRepository,
    T: TransactionRepository,
{
    /// Creates a recalculator over the given repositories.
    pub const fn new(accounts: &'a A, transactions: &'a T) -> Self {
        Self {
            accounts,
            transactions,
        }
    }

    /// Recomputes one account's balance from its history and stores it.
    ///
    /// Returns `None` if the account no longer exists; that is logged, not
    /// treated as an error.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn recompute_balance(&self, account_id: Uuid) -> AppResult<Option<Decimal>> {
        let Some(initial) = self.accounts.initial_balance(account_id).await? else {
            warn!(account_id = %account_id, "Balance recompute skipped: account not found");
            return Ok(None);
        };

        let txs = self.transactions.completed_touching_account(account_id).await?;
        let balance = compute_balance(initial, &txs, account_id);

        self.accounts.store_balance(account_id, balance).await?;
        debug!(account_id = %account_id, balance = %balance, "Balance recomputed");
        Ok(Some(balance))
    }

    /// Recomputes every listed account, in order.
    ///
    /// # Errors
    ///
    /// Stops at the first repository failure.
    pub async fn recompute_all<I>(&self, account_ids: I) -> AppResult<()>
    where
        I: IntoIterator<Item = Uuid>,
    {
        for account_id in account_ids {
            self.recompute_balance(account_id).await?;
        }
        Ok(())
    }
}

/// Distinct accounts referenced by the old and new versions of a transaction.
///
/// Pass `None` for the missing side of a create or delete.
#[must_use]
pub fn touched_accounts(
    before: Option<&TransactionRecord>,
    after: Option<&TransactionRecord>,
) -> BTreeSet<Uuid> {
    before
        .into_iter()
        .chain(after)
        .flat_map(TransactionRecord::account_ids)
        .collect()
}
