//! Unit tests for the transaction repository: monthly folding and mock
//! database plumbing.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use crate::entities::{sea_orm_active_enums::TransactionKind, transactions};
use crate::repositories::transaction::{
    TransactionFilter, TransactionRepository, fold_monthly,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_fold_monthly_splits_income_and_expense() {
    let rows = vec![
        (date(2025, 7, 4), TransactionKind::Expense, dec!(120)),
        (date(2025, 7, 10), TransactionKind::Expense, dec!(80)),
        (date(2025, 7, 15), TransactionKind::Income, dec!(1000)),
        (date(2025, 8, 1), TransactionKind::Expense, dec!(50)),
    ];

    let totals = fold_monthly(rows);
    assert_eq!(totals.len(), 2);

    assert_eq!(totals[0].month, date(2025, 7, 1));
    assert_eq!(totals[0].income, dec!(1000));
    assert_eq!(totals[0].expense, dec!(200));

    assert_eq!(totals[1].month, date(2025, 8, 1));
    assert_eq!(totals[1].income, Decimal::ZERO);
    assert_eq!(totals[1].expense, dec!(50));
}

#[test]
fn test_fold_monthly_empty() {
    assert!(fold_monthly(vec![]).is_empty());
}

#[test]
fn test_fold_monthly_orders_months_ascending() {
    let rows = vec![
        (date(2025, 9, 3), TransactionKind::Income, dec!(10)),
        (date(2025, 7, 9), TransactionKind::Income, dec!(20)),
        (date(2025, 8, 21), TransactionKind::Income, dec!(30)),
    ];

    let months: Vec<_> = fold_monthly(rows).into_iter().map(|t| t.month).collect();
    assert_eq!(
        months,
        vec![date(2025, 7, 1), date(2025, 8, 1), date(2025, 9, 1)]
    );
}

proptest! {
    /// Folding never loses or invents money: per-kind grand totals match
    /// the input rows.
    #[test]
    fn prop_fold_monthly_conserves_totals(
        rows in prop::collection::vec(
            (
                (0u32..24u32, 1u32..28u32),
                prop::bool::ANY,
                0i64..1_000_000i64,
            ),
            0..64,
        )
    ) {
        let rows: Vec<(NaiveDate, TransactionKind, Decimal)> = rows
            .into_iter()
            .map(|((month_offset, day), is_income, cents)| {
                let base = date(2024 + i32::try_from(month_offset / 12).unwrap(),
                    month_offset % 12 + 1, day);
                let kind = if is_income {
                    TransactionKind::Income
                } else {
                    TransactionKind::Expense
                };
                (base, kind, Decimal::new(cents, 2))
            })
            .collect();

        let expected_income: Decimal = rows
            .iter()
            .filter(|(_, kind, _)| *kind == TransactionKind::Income)
            .map(|(_, _, amount)| *amount)
            .sum();
        let expected_expense: Decimal = rows
            .iter()
            .filter(|(_, kind, _)| *kind == TransactionKind::Expense)
            .map(|(_, _, amount)| *amount)
            .sum();

        let totals = fold_monthly(rows);
        let income: Decimal = totals.iter().map(|t| t.income).sum();
        let expense: Decimal = totals.iter().map(|t| t.expense).sum();

        prop_assert_eq!(income, expected_income);
        prop_assert_eq!(expense, expected_expense);
    }
}

#[tokio::test]
async fn test_second_delete_reports_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
        ])
        .into_connection();

    let repo = TransactionRepository::new(db);
    let id = Uuid::new_v4();

    assert!(repo.delete(id).await.unwrap());
    assert!(!repo.delete(id).await.unwrap());
}

#[tokio::test]
async fn test_list_applies_combined_filters() {
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<transactions::Model>::new()])
        .into_connection();

    let repo = TransactionRepository::new(conn.clone());
    let filter = TransactionFilter {
        kind: Some(TransactionKind::Expense),
        category_id: Some(Uuid::new_v4()),
        date_from: Some(date(2025, 7, 1)),
        date_to: Some(date(2025, 7, 31)),
    };
    let rows = repo.list(Uuid::new_v4(), filter).await.unwrap();
    assert!(rows.is_empty());

    let log = format!("{:?}", conn.into_transaction_log());
    assert!(log.contains("user_id"));
    assert!(log.contains("kind"));
    assert!(log.contains("category_id"));
    // both date bounds present and inclusive
    assert!(log.contains(">="));
    assert!(log.contains("<="));
}

#[tokio::test]
async fn test_sum_expenses_by_category_is_one_grouped_query() {
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<std::collections::BTreeMap<&str, sea_orm::Value>>::new()])
        .into_connection();

    let repo = TransactionRepository::new(conn.clone());
    let totals = repo
        .sum_expenses_by_category(Uuid::new_v4(), date(2025, 7, 1), date(2025, 7, 31))
        .await
        .unwrap();
    assert!(totals.is_empty());

    let log = format!("{:?}", conn.into_transaction_log());
    assert!(log.contains("SUM"));
    assert!(log.contains("GROUP BY"));
    assert!(log.contains("category_id"));
}
