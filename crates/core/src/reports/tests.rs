//! Report tests.

use rstest::rstest;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::*;
use crate::category::CategoryKind;
use crate::testing::{date, record};
use crate::transaction::{TransactionKind, TransactionStatus};

#[rstest]
#[case(ReportPeriod::Week, date(2024, 5, 14), date(2024, 5, 8), date(2024, 5, 14))]
#[case(ReportPeriod::Month, date(2024, 2, 14), date(2024, 2, 1), date(2024, 2, 29))]
#[case(ReportPeriod::Quarter, date(2024, 5, 14), date(2024, 4, 1), date(2024, 6, 30))]
#[case(ReportPeriod::Quarter, date(2024, 12, 31), date(2024, 10, 1), date(2024, 12, 31))]
#[case(ReportPeriod::Year, date(2024, 5, 14), date(2024, 1, 1), date(2024, 12, 31))]
fn test_period_windows(
    #[case] period: ReportPeriod,
    #[case] today: chrono::NaiveDate,
    #[case] start: chrono::NaiveDate,
    #[case] end: chrono::NaiveDate,
) {
    assert_eq!(period.window(today), DateWindow { start, end });
}

#[test]
fn test_default_period_is_month() {
    assert_eq!(ReportPeriod::default(), ReportPeriod::Month);
    assert_eq!("QUARTER".parse::<ReportPeriod>().unwrap(), ReportPeriod::Quarter);
    assert!("decade".parse::<ReportPeriod>().is_err());
}

#[test]
fn test_summarize_counts_completed_in_window() {
    let acc = Uuid::new_v4();
    let mut pending = record(TransactionKind::Income, dec!(999), acc, date(2024, 3, 5));
    pending.status = TransactionStatus::Pending;

    let txs = vec![
        record(TransactionKind::Income, dec!(1000), acc, date(2024, 3, 1)),
        record(TransactionKind::Expense, dec!(250.50), acc, date(2024, 3, 10)),
        record(TransactionKind::Transfer, dec!(100), acc, date(2024, 3, 11)),
        record(TransactionKind::Expense, dec!(75), acc, date(2024, 4, 1)),
        pending,
    ];

    let summary = summarize(&txs, ReportPeriod::Month.window(date(2024, 3, 20)));

    assert_eq!(summary.income, dec!(1000));
    assert_eq!(summary.expense, dec!(250.50));
    assert_eq!(summary.transfers, dec!(100));
    assert_eq!(summary.net, dec!(749.50));
    assert_eq!(summary.count, 3);
}

#[test]
fn test_category_stats_average() {
    let acc = Uuid::new_v4();
    let food = Uuid::new_v4();
    let txs: Vec<_> = [dec!(10), dec!(20), dec!(40)]
        .into_iter()
        .map(|amt| {
            let mut tx = record(TransactionKind::Expense, amt, acc, date(2024, 1, 5));
            tx.category_id = Some(food);
            tx
        })
        .collect();

    let window = ReportPeriod::Month.window(date(2024, 1, 20));
    let stats = category_stats(&txs, food, window);
    assert_eq!(stats.total, dec!(70));
    assert_eq!(stats.count, 3);
    assert_eq!(stats.average, dec!(23.33));

    let empty = category_stats(&txs, Uuid::new_v4(), window);
    assert_eq!(empty.count, 0);
    assert_eq!(empty.average, dec!(0));
}

#[test]
fn test_category_overview_shares_per_kind() {
    let acc = Uuid::new_v4();
    let food = Uuid::new_v4();
    let rent = Uuid::new_v4();
    let fun = Uuid::new_v4();
    let salary = Uuid::new_v4();
    let categories = vec![
        (food, "Food".to_string(), CategoryKind::Expense),
        (rent, "Rent".to_string(), CategoryKind::Expense),
        (fun, "Fun".to_string(), CategoryKind::Expense),
        (salary, "Salary".to_string(), CategoryKind::Income),
    ];

    let tx = |kind, amt, cat| {
        let mut tx = record(kind, amt, acc, date(2024, 1, 5));
        tx.category_id = Some(cat);
        tx
    };
    let txs = vec![
        tx(TransactionKind::Expense, dec!(100), food),
        tx(TransactionKind::Expense, dec!(200), rent),
        tx(TransactionKind::Income, dec!(3000), salary),
    ];

    let rows = category_overview(&categories, &txs, ReportPeriod::Month.window(date(2024, 1, 9)));

    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].category_id, salary);
    assert_eq!(rows[0].percentage, dec!(100));
    assert_eq!(rows[1].category_id, rent);
    assert_eq!(rows[1].percentage, dec!(66.67));
    assert_eq!(rows[2].percentage, dec!(33.33));
    assert_eq!(rows[3].category_id, fun);
    assert_eq!(rows[3].total, dec!(0));
}

#[test]
fn test_transfers_never_count_towards_a_category() {
    let acc = Uuid::new_v4();
    let food = Uuid::new_v4();
    let categories = vec![(food, "Food".to_string(), CategoryKind::Expense)];

    let tx = |kind, amt| {
        let mut tx = record(kind, amt, acc, date(2024, 1, 5));
        tx.category_id = Some(food);
        tx
    };
    let txs = vec![
        tx(TransactionKind::Expense, dec!(50)),
        tx(TransactionKind::Transfer, dec!(500)),
    ];
    let window = ReportPeriod::Month.window(date(2024, 1, 9));

    let stats = category_stats(&txs, food, window);
    assert_eq!(stats.total, dec!(50));
    assert_eq!(stats.count, 1);

    let rows = category_overview(&categories, &txs, window);
    assert_eq!(rows[0].total, dec!(50));
    assert_eq!(rows[0].count, 1);
    assert_eq!(rows[0].percentage, dec!(100));
}
