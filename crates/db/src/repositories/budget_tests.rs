//! Unit tests for the budget repository against a mock database.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use crate::entities::{budgets, sea_orm_active_enums::BudgetPeriod};
use crate::repositories::budget::{BudgetRepository, UpdateBudgetInput};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_budget() -> budgets::Model {
    let now = chrono::Utc::now().fixed_offset();
    budgets::Model {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        category_id: Uuid::new_v4(),
        amount: dec!(500),
        period: BudgetPeriod::Monthly,
        start_date: date(2025, 7, 1),
        end_date: date(2025, 7, 31),
        created_at: now,
        updated_at: now,
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

    let repo = BudgetRepository::new(db);
    let id = Uuid::new_v4();

    assert!(repo.delete(id).await.unwrap());
    // second call reports missing without erroring
    assert!(!repo.delete(id).await.unwrap());
}

#[tokio::test]
async fn test_update_missing_budget_returns_none() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<budgets::Model>::new()])
        .into_connection();

    let repo = BudgetRepository::new(db);
    let result = repo
        .update(Uuid::new_v4(), UpdateBudgetInput::default())
        .await
        .unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn test_find_active_bounds_both_ends_of_window() {
    let budget = sample_budget();
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![budget.clone()]])
        .into_connection();

    let repo = BudgetRepository::new(conn.clone());
    let found = repo
        .find_active(budget.user_id, date(2025, 7, 15))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, budget.id);

    // the generated query must constrain both window bounds
    let log = format!("{:?}", conn.into_transaction_log());
    assert!(log.contains("start_date"));
    assert!(log.contains("end_date"));
    assert!(log.contains("<="));
    assert!(log.contains(">="));
}

#[tokio::test]
async fn test_find_overlapping_constrains_user_and_category() {
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<budgets::Model>::new()])
        .into_connection();

    let repo = BudgetRepository::new(conn.clone());
    let result = repo
        .find_overlapping(
            Uuid::new_v4(),
            Uuid::new_v4(),
            date(2025, 7, 1),
            date(2025, 7, 31),
        )
        .await
        .unwrap();
    assert!(result.is_none());

    let log = format!("{:?}", conn.into_transaction_log());
    assert!(log.contains("user_id"));
    assert!(log.contains("category_id"));
    assert!(log.contains("start_date"));
    assert!(log.contains("end_date"));
}

#[tokio::test]
async fn test_update_merges_patch_and_restamps() {
    let stored = sample_budget();
    let mut updated = stored.clone();
    updated.end_date = date(2025, 8, 31);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![stored.clone()], vec![updated.clone()]])
        .into_connection();

    let repo = BudgetRepository::new(db);
    let result = repo
        .update(
            stored.id,
            UpdateBudgetInput {
                end_date: Some(date(2025, 8, 31)),
                ..UpdateBudgetInput::default()
            },
        )
        .await
        .unwrap()
        .expect("budget should be found");

    assert_eq!(result.end_date, date(2025, 8, 31));
    // untouched fields survive the merge
    assert_eq!(result.amount, stored.amount);
    assert_eq!(result.start_date, stored.start_date);
}
