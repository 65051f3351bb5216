//! Projection of fixed (recurring) transactions.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::transaction::{FixedFrequency, TransactionKind, TransactionRecord, TransactionStatus};

/// Months projected when the caller does not say.
pub const DEFAULT_FORECAST_MONTHS: u32 = 6;

/// Longest projection allowed.
pub const MAX_FORECAST_MONTHS: u32 = 24;

/// Projected cash flow of one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastMonth {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-based.
    pub month: u32,
    /// Projected incomes.
    #[serde(with = "rust_decimal::serde::float")]
    pub income: Decimal,
    /// Projected expenses.
    #[serde(with = "rust_decimal::serde::float")]
    pub expense: Decimal,
    /// Income minus expense.
    #[serde(with = "rust_decimal::serde::float")]
    pub net: Decimal,
}

/// The `k`-th recurrence of `date`, anchored on the original day so monthly
/// series do not drift after a short month.
fn occurrence(date: NaiveDate, frequency: FixedFrequency, k: u32) -> Option<NaiveDate> {
    match frequency {
        FixedFrequency::Weekly => date.checked_add_days(Days::new(7 * u64::from(k))),
        FixedFrequency::Monthly => date.checked_add_months(Months::new(k)),
        FixedFrequency::Yearly => date.checked_add_months(Months::new(12 * k)),
    }
}

/// Projects fixed transactions over `months` calendar months starting with
/// the month of `from`.
///
/// Only occurrences on or after `from` are counted. Cancelled and non-fixed
/// rows are skipped, and transfers never change the projected net. `months`
/// is clamped to `1..=MAX_FORECAST_MONTHS`. Months without activity are still
/// listed.
#[must_use]
pub fn forecast(txs: &[TransactionRecord], from: NaiveDate, months: u32) -> Vec<ForecastMonth> {
    let months = months.clamp(1, MAX_FORECAST_MONTHS);
    let first = from.with_day(1).unwrap_or(from);
    let Some(horizon) = first
        .checked_add_months(Months::new(months))
        .and_then(|d| d.pred_opt())
    else {
        return Vec::new();
    };

    let mut buckets: BTreeMap<(i32, u32), (Decimal, Decimal)> = (0..months)
        .filter_map(|i| first.checked_add_months(Months::new(i)))
        .map(|d| ((d.year(), d.month()), (Decimal::ZERO, Decimal::ZERO)))
        .collect();

    let recurring = txs.iter().filter(|tx| {
        tx.is_fixed
            && tx.status != TransactionStatus::Cancelled
            && tx.kind != TransactionKind::Transfer
    });

    for tx in recurring {
        let Some(frequency) = tx.fixed_frequency else {
            continue;
        };
        for date in (0..)
            .map_while(|k| occurrence(tx.date, frequency, k))
            .take_while(|d| *d <= horizon)
            .filter(|d| *d >= from)
        {
            if let Some((income, expense)) = buckets.get_mut(&(date.year(), date.month())) {
                match tx.kind {
                    TransactionKind::Income => *income += tx.amount,
                    TransactionKind::Expense => *expense += tx.amount,
                    TransactionKind::Transfer => {}
                }
            }
        }
    }

    buckets
        .into_iter()
        .map(|((year, month), (income, expense))| ForecastMonth {
            year,
            month,
            income,
            expense,
            net: income - expense,
        })
        .collect()
}
