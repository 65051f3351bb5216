//! Report computations.

use std::collections::HashMap;

use rust_decimal::Decimal;
use uuid::Uuid;

use super::period::DateWindow;
use super::types::{CategoryShare, CategoryStats, PeriodSummary};
use crate::category::CategoryKind;
use crate::transaction::{TransactionKind, TransactionRecord};

fn in_window<'a, I>(txs: I, window: DateWindow) -> impl Iterator<Item = &'a TransactionRecord>
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    txs.into_iter()
        .filter(move |tx| tx.is_completed() && window.contains(tx.date))
}

/// Completed income and expense in `window`. A transfer's category is a label
/// only and never counts towards category figures.
fn categorised<'a>(
    txs: &'a [TransactionRecord],
    window: DateWindow,
) -> impl Iterator<Item = &'a TransactionRecord> {
    in_window(txs, window).filter(|tx| tx.kind != TransactionKind::Transfer)
}

/// Totals completed transactions dated within `window`.
#[must_use]
pub fn summarize(txs: &[TransactionRecord], window: DateWindow) -> PeriodSummary {
    let mut summary = PeriodSummary {
        window,
        income: Decimal::ZERO,
        expense: Decimal::ZERO,
        transfers: Decimal::ZERO,
        net: Decimal::ZERO,
        count: 0,
    };

    for tx in in_window(txs, window) {
        match tx.kind {
            TransactionKind::Income => summary.income += tx.amount,
            TransactionKind::Expense => summary.expense += tx.amount,
            TransactionKind::Transfer => summary.transfers += tx.amount,
        }
        summary.count += 1;
    }
    summary.net = summary.income - summary.expense;
    summary
}

/// Total, count and mean of one category's completed transactions in `window`.
#[must_use]
pub fn category_stats(
    txs: &[TransactionRecord],
    category_id: Uuid,
    window: DateWindow,
) -> CategoryStats {
    let (total, count) = categorised(txs, window)
        .filter(|tx| tx.category_id == Some(category_id))
        .fold((Decimal::ZERO, 0u64), |(total, count), tx| {
            (total + tx.amount, count + 1)
        });

    let average = if count == 0 {
        Decimal::ZERO
    } else {
        (total / Decimal::from(count)).round_dp(2)
    };

    CategoryStats {
        category_id,
        window,
        total,
        count,
        average,
    }
}

/// Per-category totals and their share of their kind's total.
///
/// `categories` lists `(id, name, kind)` for every category to report,
/// including those without activity. Rows come back sorted by total, largest
/// first; ties keep name order.
#[must_use]
pub fn category_overview(
    categories: &[(Uuid, String, CategoryKind)],
    txs: &[TransactionRecord],
    window: DateWindow,
) -> Vec<CategoryShare> {
    let mut per_category: HashMap<Uuid, (Decimal, u64)> = HashMap::new();
    for tx in categorised(txs, window) {
        if let Some(category_id) = tx.category_id {
            let entry = per_category.entry(category_id).or_default();
            entry.0 += tx.amount;
            entry.1 += 1;
        }
    }

    let mut kind_totals: HashMap<CategoryKind, Decimal> = HashMap::new();
    for (id, _, kind) in categories {
        let total = per_category.get(id).map_or(Decimal::ZERO, |(t, _)| *t);
        *kind_totals.entry(*kind).or_default() += total;
    }

    let mut rows: Vec<CategoryShare> = categories
        .iter()
        .map(|(id, name, kind)| {
            let (total, count) = per_category.get(id).copied().unwrap_or_default();
            let kind_total = kind_totals.get(kind).copied().unwrap_or_default();
            let percentage = if kind_total.is_zero() {
                Decimal::ZERO
            } else {
                (total / kind_total * Decimal::ONE_HUNDRED).round_dp(2)
            };
            CategoryShare {
                category_id: *id,
                name: name.clone(),
                kind: *kind,
                total,
                count,
                percentage,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
    rows
}
