//! Balance recalculation tests.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::*;
use crate::testing::{MemoryStore, date, record};
use crate::transaction::{TransactionKind, TransactionRecord, TransactionStatus};

fn transfer(amount: Decimal, from: Uuid, to: Uuid) -> TransactionRecord {
    let mut tx = record(TransactionKind::Transfer, amount, from, date(2024, 1, 5));
    tx.to_account_id = Some(to);
    tx
}

#[tokio::test]
async fn test_recompute_follows_documented_scenario() {
    let store = MemoryStore::default();
    let a = store.add_account(dec!(1000));
    let b = store.add_account(dec!(0));
    let recalc = BalanceRecalculator::new(&store, &store);

    store.upsert(record(TransactionKind::Expense, dec!(200), a, date(2024, 1, 2)));
    assert_eq!(recalc.recompute_balance(a).await.unwrap(), Some(dec!(800)));

    store.upsert(record(TransactionKind::Income, dec!(500), a, date(2024, 1, 3)));
    assert_eq!(recalc.recompute_balance(a).await.unwrap(), Some(dec!(1300)));

    let tx = transfer(dec!(100), a, b);
    store.upsert(tx.clone());
    recalc.recompute_all(touched_accounts(None, Some(&tx))).await.unwrap();

    assert_eq!(store.balance(a), Some(dec!(1200)));
    assert_eq!(store.balance(b), Some(dec!(100)));
}

#[tokio::test]
async fn test_non_completed_transactions_do_not_move_balance() {
    let store = MemoryStore::default();
    let a = store.add_account(dec!(50));
    let recalc = BalanceRecalculator::new(&store, &store);

    for status in [TransactionStatus::Pending, TransactionStatus::Cancelled] {
        let mut tx = record(TransactionKind::Expense, dec!(20), a, date(2024, 1, 1));
        tx.status = status;
        store.upsert(tx);
    }

    assert_eq!(recalc.recompute_balance(a).await.unwrap(), Some(dec!(50)));
}

#[tokio::test]
async fn test_missing_account_is_skipped() {
    let store = MemoryStore::default();
    let recalc = BalanceRecalculator::new(&store, &store);

    assert_eq!(recalc.recompute_balance(Uuid::new_v4()).await.unwrap(), None);
}

#[tokio::test]
async fn test_repointing_refreshes_old_and_new_account() {
    let store = MemoryStore::default();
    let a = store.add_account(dec!(100));
    let b = store.add_account(dec!(100));
    let recalc = BalanceRecalculator::new(&store, &store);

    let before = record(TransactionKind::Expense, dec!(30), a, date(2024, 2, 1));
    store.upsert(before.clone());
    recalc.recompute_balance(a).await.unwrap();
    assert_eq!(store.balance(a), Some(dec!(70)));

    let mut after = before.clone();
    after.account_id = b;
    store.upsert(after.clone());
    recalc
        .recompute_all(touched_accounts(Some(&before), Some(&after)))
        .await
        .unwrap();

    assert_eq!(store.balance(a), Some(dec!(100)));
    assert_eq!(store.balance(b), Some(dec!(70)));
}

#[tokio::test]
async fn test_delete_restores_balance() {
    let store = MemoryStore::default();
    let a = store.add_account(dec!(10));
    let recalc = BalanceRecalculator::new(&store, &store);

    let tx = record(TransactionKind::Income, dec!(5.50), a, date(2024, 3, 1));
    store.upsert(tx.clone());
    recalc.recompute_balance(a).await.unwrap();
    assert_eq!(store.balance(a), Some(dec!(15.50)));

    let removed = store.remove(tx.id).unwrap();
    recalc
        .recompute_all(touched_accounts(Some(&removed), None))
        .await
        .unwrap();
    assert_eq!(store.balance(a), Some(dec!(10)));
}

#[test]
fn test_touched_accounts_deduplicates() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let before = transfer(dec!(1), a, b);
    let after = transfer(dec!(2), b, a);

    let touched = touched_accounts(Some(&before), Some(&after));
    assert_eq!(touched.len(), 2);
    assert!(touched.contains(&a) && touched.contains(&b));
}

#[test]
fn test_balance_history_applies_each_day() {
    let a = Uuid::new_v4();
    let txs = vec![
        record(TransactionKind::Income, dec!(100), a, date(2024, 1, 1)),
        record(TransactionKind::Expense, dec!(40), a, date(2024, 1, 9)),
        record(TransactionKind::Expense, dec!(10), a, date(2024, 1, 10)),
    ];

    let points = balance_history(dec!(0), &txs, a, date(2024, 1, 10), 3);

    assert_eq!(points.len(), 3);
    assert_eq!(points[0].date, date(2024, 1, 8));
    assert_eq!(points[0].balance, dec!(100));
    assert_eq!(points[1].balance, dec!(60));
    assert_eq!(points[2].balance, dec!(50));
}

#[test]
fn test_balance_history_clamps_days() {
    let a = Uuid::new_v4();
    assert_eq!(balance_history(dec!(1), &[], a, date(2024, 1, 1), 0).len(), 1);
    assert_eq!(balance_history(dec!(1), &[], a, date(2024, 1, 1), 1000).len(), 365);
}

fn amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn kind() -> impl Strategy<Value = TransactionKind> {
    prop_oneof![
        Just(TransactionKind::Income),
        Just(TransactionKind::Expense),
        Just(TransactionKind::Transfer),
    ]
}

fn status() -> impl Strategy<Value = TransactionStatus> {
    prop_oneof![
        Just(TransactionStatus::Pending),
        Just(TransactionStatus::Completed),
        Just(TransactionStatus::Cancelled),
    ]
}

proptest! {
    /// Transfers between two accounts conserve their combined balance.
    #[test]
    fn test_transfers_conserve_money(amounts in prop::collection::vec(amount(), 0..20)) {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let txs: Vec<_> = amounts
            .iter()
            .enumerate()
            .map(|(i, amt)| if i % 2 == 0 { transfer(*amt, a, b) } else { transfer(*amt, b, a) })
            .collect();

        let total = compute_balance(dec!(500), &txs, a) + compute_balance(dec!(500), &txs, b);
        prop_assert_eq!(total, dec!(1000));
    }

    /// The balance equals the opening balance plus completed incomes minus
    /// completed outflows, whatever the mix of kinds and statuses.
    #[test]
    fn test_balance_matches_completed_sums(
        rows in prop::collection::vec((kind(), status(), amount()), 0..30),
    ) {
        let a = Uuid::new_v4();
        let other = Uuid::new_v4();
        let txs: Vec<_> = rows
            .iter()
            .map(|(k, s, amt)| {
                let mut tx = record(*k, *amt, a, date(2024, 1, 1));
                tx.status = *s;
                if *k == TransactionKind::Transfer {
                    tx.to_account_id = Some(other);
                }
                tx
            })
            .collect();

        let expected = rows
            .iter()
            .filter(|(_, s, _)| *s == TransactionStatus::Completed)
            .fold(dec!(0), |acc, (k, _, amt)| match k {
                TransactionKind::Income => acc + amt,
                _ => acc - amt,
            });

        prop_assert_eq!(compute_balance(dec!(0), &txs, a), expected);
        prop_assert_eq!(
            compute_balance(dec!(0), &txs, other),
            rows.iter()
                .filter(|(k, s, _)| {
                    *k == TransactionKind::Transfer && *s == TransactionStatus::Completed
                })
                .map(|(_, _, amt)| *amt)
                .sum::<Decimal>()
        );
    }
}
