//! Pure balance rules.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::transaction::{TransactionKind, TransactionRecord};

/// Signed effect of one transaction on one account.
///
/// The source side moves by the kind's sign; the destination of a transfer
/// always gains. Non-completed transactions and unrelated accounts yield zero.
#[must_use]
pub fn balance_effect(tx: &TransactionRecord, account_id: Uuid) -> Decimal {
    if !tx.is_completed() {
        return Decimal::ZERO;
    }

    let mut effect = Decimal::ZERO;
    if tx.account_id == account_id {
        effect += match tx.kind {
            TransactionKind::Income => tx.amount,
            TransactionKind::Expense | TransactionKind::Transfer => -tx.amount,
        };
    }
    if tx.to_account_id == Some(account_id) {
        effect += tx.amount;
    }
    effect
}

/// Folds transactions onto an opening balance.
#[must_use]
pub fn compute_balance<'a, I>(initial: Decimal, txs: I, account_id: Uuid) -> Decimal
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    txs.into_iter()
        .fold(initial, |acc, tx| acc + balance_effect(tx, account_id))
}

/// Balance at the end of one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BalancePoint {
    /// Calendar day.
    pub date: NaiveDate,
    /// Balance after every completed transaction dated on or before `date`.
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

/// Daily balances for the `days` days ending at `today`, oldest first.
///
/// `days` is clamped to `1..=365`.
#[must_use]
pub fn balance_history(
    initial: Decimal,
    txs: &[TransactionRecord],
    account_id: Uuid,
    today: NaiveDate,
    days: u32,
) -> Vec<BalancePoint> {
    let days = days.clamp(1, 365);
    let first = today - Days::new(u64::from(days - 1));

    let mut dated: Vec<(NaiveDate, Decimal)> = txs
        .iter()
        .map(|tx| (tx.date, balance_effect(tx, account_id)))
        .filter(|(_, effect)| !effect.is_zero())
        .collect();
    dated.sort_by_key(|(date, _)| *date);

    let mut running = initial;
    let mut pending = dated.into_iter().peekable();
    let mut points = Vec::with_capacity(days as usize);

    for date in first.iter_days().take(days as usize) {
        while let Some((_, effect)) = pending.next_if(|(d, _)| *d <= date) {
            running += effect;
        }
        points.push(BalancePoint {
            date,
            balance: running,
        });
    }
    points
}
