//! In-memory repositories for service tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use financeflow_shared::AppResult;

use crate::repository::{AccountRepository, BudgetRepository, BudgetScope, TransactionRepository};
use crate::transaction::{TransactionKind, TransactionRecord, TransactionStatus};

#[derive(Debug, Default)]
struct State {
    initial: HashMap<Uuid, Decimal>,
    balances: HashMap<Uuid, Decimal>,
    transactions: Vec<TransactionRecord>,
    budgets: HashMap<Uuid, BudgetScope>,
    spent: HashMap<Uuid, Decimal>,
}

/// Shared in-memory store; clones see the same data.
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub(crate) fn add_account(&self, initial: Decimal) -> Uuid {
        let id = Uuid::new_v4();
        let mut state = self.state.lock().unwrap();
        state.initial.insert(id, initial);
        state.balances.insert(id, initial);
        id
    }

    pub(crate) fn add_budget(&self, scope: BudgetScope) {
        self.state.lock().unwrap().budgets.insert(scope.budget_id, scope);
    }

    pub(crate) fn upsert(&self, tx: TransactionRecord) {
        let mut state = self.state.lock().unwrap();
        state.transactions.retain(|t| t.id != tx.id);
        state.transactions.push(tx);
    }

    pub(crate) fn remove(&self, id: Uuid) -> Option<TransactionRecord> {
        let mut state = self.state.lock().unwrap();
        let pos = state.transactions.iter().position(|t| t.id == id)?;
        Some(state.transactions.remove(pos))
    }

    pub(crate) fn balance(&self, account_id: Uuid) -> Option<Decimal> {
        self.state.lock().unwrap().balances.get(&account_id).copied()
    }

    pub(crate) fn spent(&self, budget_id: Uuid) -> Option<Decimal> {
        self.state.lock().unwrap().spent.get(&budget_id).copied()
    }
}

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn initial_balance(&self, account_id: Uuid) -> AppResult<Option<Decimal>> {
        Ok(self.state.lock().unwrap().initial.get(&account_id).copied())
    }

    async fn store_balance(&self, account_id: Uuid, balance: Decimal) -> AppResult<()> {
        self.state.lock().unwrap().balances.insert(account_id, balance);
        Ok(())
    }
}

#[async_trait]
impl TransactionRepository for MemoryStore {
    // Deliberately unfiltered: the calculators must not rely on the store.
    async fn completed_touching_account(&self, _: Uuid) -> AppResult<Vec<TransactionRecord>> {
        Ok(self.state.lock().unwrap().transactions.clone())
    }

    async fn completed_expenses_in_window(
        &self,
        _: Uuid,
        _: Uuid,
        _: NaiveDate,
        _: NaiveDate,
    ) -> AppResult<Vec<TransactionRecord>> {
        Ok(self.state.lock().unwrap().transactions.clone())
    }
}

#[async_trait]
impl BudgetRepository for MemoryStore {
    async fn budget_scope(&self, budget_id: Uuid) -> AppResult<Option<BudgetScope>> {
        Ok(self.state.lock().unwrap().budgets.get(&budget_id).copied())
    }

    async fn store_spent(&self, budget_id: Uuid, spent: Decimal) -> AppResult<()> {
        self.state.lock().unwrap().spent.insert(budget_id, spent);
        Ok(())
    }
}

/// Builds a completed transaction with sensible defaults.
pub(crate) fn record(
    kind: TransactionKind,
    amount: Decimal,
    account_id: Uuid,
    date: NaiveDate,
) -> TransactionRecord {
    TransactionRecord {
        id: Uuid::new_v4(),
        user_id: Uuid::nil(),
        account_id,
        to_account_id: None,
        category_id: None,
        kind,
        status: TransactionStatus::Completed,
        amount,
        date,
        description: format!("{kind} {amount}"),
        is_fixed: false,
        fixed_frequency: None,
    }
}

/// Shorthand for a calendar date.
pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
