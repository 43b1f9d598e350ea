//! Budget management and progress routes.

use std::collections::HashMap;
use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use fintrack_core::budget::{
    BudgetProgress, compute_progress, effective_window, spent_in_window, validate_window,
};
use fintrack_core::transaction::validate_amount;
use fintrack_db::repositories::budget::{BudgetRepository, CreateBudgetInput, UpdateBudgetInput};
use fintrack_db::repositories::transaction::{TransactionFilter, TransactionRepository};
use fintrack_db::CategoryRepository;
use fintrack_db::entities::{budgets, sea_orm_active_enums::BudgetPeriod};
use fintrack_shared::AppError;
use fintrack_shared::types::BudgetId;

/// Creates the budget routes (requires auth middleware to be applied
/// externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budgets", get(list_budgets).post(create_budget))
        .route("/budgets/progress/all", get(bulk_progress))
        .route(
            "/budgets/{id}",
            get(get_budget).put(update_budget).delete(delete_budget),
        )
        .route("/budgets/{id}/progress", get(budget_progress))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing budgets.
#[derive(Debug, Deserialize)]
pub struct ListBudgetsQuery {
    /// When true, only budgets whose window contains today.
    pub active: Option<bool>,
}

/// Request body for creating a budget.
#[derive(Debug, Deserialize)]
pub struct CreateBudgetRequest {
    /// Category the limit applies to.
    pub category_id: Uuid,
    /// Spending limit; must be strictly positive.
    pub amount: Decimal,
    /// Period: monthly, quarterly, yearly.
    pub period: String,
    /// Window start (inclusive).
    pub start_date: NaiveDate,
    /// Window end (inclusive).
    pub end_date: NaiveDate,
}

/// Request body for updating a budget.
#[derive(Debug, Deserialize)]
pub struct UpdateBudgetRequest {
    /// New category.
    pub category_id: Option<Uuid>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New period.
    pub period: Option<String>,
    /// New window start.
    pub start_date: Option<NaiveDate>,
    /// New window end.
    pub end_date: Option<NaiveDate>,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Converts a period string to the database enum via the domain type.
fn parse_period(s: &str) -> Option<BudgetPeriod> {
    fintrack_core::budget::BudgetPeriod::from_str(s)
        .ok()
        .map(Into::into)
}

/// Converts the database enum to its wire string.
fn period_to_string(period: &BudgetPeriod) -> String {
    fintrack_core::budget::BudgetPeriod::from(period.clone()).to_string()
}

/// Serializes a budget for API responses.
fn budget_json(b: &budgets::Model) -> serde_json::Value {
    json!({
        "id": b.id,
        "category_id": b.category_id,
        "amount": b.amount.to_string(),
        "period": period_to_string(&b.period),
        "start_date": b.start_date,
        "end_date": b.end_date,
        "created_at": b.created_at,
        "updated_at": b.updated_at
    })
}

/// Serializes a budget together with its computed progress.
fn progress_json(b: &budgets::Model, progress: &BudgetProgress) -> serde_json::Value {
    json!({
        "budget_id": b.id,
        "category_id": b.category_id,
        "period": period_to_string(&b.period),
        "start_date": b.start_date,
        "end_date": b.end_date,
        "budgeted": progress.budgeted.to_string(),
        "spent": progress.spent.to_string(),
        "remaining": progress.remaining.to_string(),
        "percent_used": progress.percent_used,
        "is_over_budget": progress.is_over_budget,
        "status": progress.status
    })
}

/// Returns the shared window iff every budget has the same one.
fn uniform_window(budgets: &[budgets::Model]) -> Option<(NaiveDate, NaiveDate)> {
    let first = budgets.first()?;
    let window = (first.start_date, first.end_date);
    budgets
        .iter()
        .all(|b| (b.start_date, b.end_date) == window)
        .then_some(window)
}

fn internal_error() -> axum::response::Response {
    super::error_response(&AppError::Internal("An error occurred".to_string()))
}

fn not_found() -> axum::response::Response {
    super::error_response(&AppError::NotFound("Budget not found".to_string()))
}

fn invalid_period() -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "invalid_period",
            "message": "Period must be one of: monthly, quarterly, yearly",
            "details": [{ "field": "period", "rule": "one_of: monthly, quarterly, yearly" }]
        })),
    )
        .into_response()
}

fn invalid_amount() -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "invalid_amount",
            "message": "Amount must be greater than zero",
            "details": [{ "field": "amount", "rule": "greater_than_zero" }]
        })),
    )
        .into_response()
}

fn invalid_window(start: NaiveDate, end: NaiveDate) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "invalid_window",
            "message": format!("Start date {start} must be before end date {end}"),
            "details": [{ "field": "start_date", "rule": "before_end_date" }]
        })),
    )
        .into_response()
}

/// Rejects when the record belongs to someone else.
fn ensure_owner(record_user_id: Uuid, auth: &AuthUser) -> Result<(), axum::response::Response> {
    if record_user_id == auth.user_id().into_inner() {
        Ok(())
    } else {
        Err(super::error_response(&AppError::Forbidden(
            "You do not own this record".to_string(),
        )))
    }
}

/// Confirms the referenced category exists before writing.
async fn check_category_exists(
    state: &AppState,
    category_id: Uuid,
) -> Result<(), axum::response::Response> {
    let category_repo = CategoryRepository::new((*state.db).clone());
    match category_repo.find_by_id(category_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "unknown_category",
                "message": format!("Category not found: {category_id}"),
                "details": [{ "field": "category_id", "rule": "must_exist" }]
            })),
        )
            .into_response()),
        Err(e) => {
            error!(error = %e, "Failed to check category");
            Err(internal_error())
        }
    }
}

/// Sums the caller's expense spend inside one budget's window.
///
/// Fetches the user's transactions in range and aggregates in memory;
/// the bulk endpoint prefers the grouped query instead.
async fn spent_for_budget(
    state: &AppState,
    user_id: Uuid,
    budget: &budgets::Model,
) -> Result<Decimal, axum::response::Response> {
    let repo = TransactionRepository::new((*state.db).clone());

    let filter = TransactionFilter {
        date_from: Some(budget.start_date),
        date_to: Some(budget.end_date),
        ..TransactionFilter::default()
    };

    let rows = repo.list(user_id, filter).await.map_err(|e| {
        error!(error = %e, "Failed to load transactions for progress");
        internal_error()
    })?;

    Ok(spent_in_window(
        rows.iter()
            .map(|t| (t.kind.clone().into(), t.category_id, t.date, t.amount)),
        &budget.category_id,
        budget.start_date,
        budget.end_date,
    ))
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/budgets` - List own budgets, optionally only currently-active.
async fn list_budgets(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListBudgetsQuery>,
) -> impl IntoResponse {
    let repo = BudgetRepository::new((*state.db).clone());
    let user_id = auth.user_id().into_inner();

    let result = if query.active.unwrap_or(false) {
        let today = chrono::Utc::now().date_naive();
        repo.find_active(user_id, today).await
    } else {
        repo.find_by_user(user_id).await
    };

    match result {
        Ok(rows) => {
            let response: Vec<serde_json::Value> = rows.iter().map(budget_json).collect();
            (StatusCode::OK, Json(json!({ "budgets": response }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list budgets");
            internal_error()
        }
    }
}

/// POST `/budgets` - Create a budget.
async fn create_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateBudgetRequest>,
) -> impl IntoResponse {
    let Some(period) = parse_period(&payload.period) else {
        return invalid_period();
    };

    if validate_amount(payload.amount).is_err() {
        return invalid_amount();
    }

    // Window order is checked here, before anything reaches the repository
    if validate_window(payload.start_date, payload.end_date).is_err() {
        return invalid_window(payload.start_date, payload.end_date);
    }

    if let Err(response) = check_category_exists(&state, payload.category_id).await {
        return response;
    }

    let repo = BudgetRepository::new((*state.db).clone());
    let user_id = auth.user_id().into_inner();

    // Advisory check: one intended active budget per category. Enforced
    // here, not by the schema.
    match repo
        .find_overlapping(
            user_id,
            payload.category_id,
            payload.start_date,
            payload.end_date,
        )
        .await
    {
        Ok(Some(existing)) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "overlapping_budget",
                    "message": format!(
                        "A budget for this category already covers {} to {}",
                        existing.start_date, existing.end_date
                    )
                })),
            )
                .into_response();
        }
        Ok(None) => {}
        Err(e) => {
            error!(error = %e, "Failed to check for overlapping budget");
            return internal_error();
        }
    }

    let input = CreateBudgetInput {
        user_id,
        category_id: payload.category_id,
        amount: payload.amount,
        period,
        start_date: payload.start_date,
        end_date: payload.end_date,
    };

    match repo.create(input).await {
        Ok(budget) => {
            info!(
                user_id = %auth.user_id(),
                budget_id = %budget.id,
                "Budget created"
            );
            (StatusCode::CREATED, Json(budget_json(&budget))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create budget");
            internal_error()
        }
    }
}

/// GET `/budgets/{id}` - Fetch one of the caller's budgets.
async fn get_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<BudgetId>,
) -> impl IntoResponse {
    let repo = BudgetRepository::new((*state.db).clone());

    match repo.find_by_id(id.into_inner()).await {
        Ok(Some(budget)) => {
            if let Err(response) = ensure_owner(budget.user_id, &auth) {
                return response;
            }
            (StatusCode::OK, Json(budget_json(&budget))).into_response()
        }
        Ok(None) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to fetch budget");
            internal_error()
        }
    }
}

/// PUT `/budgets/{id}` - Update one of the caller's budgets.
///
/// A patch touching either window bound is validated against the merged
/// effective window, so an end-only change still honors the stored start.
async fn update_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<BudgetId>,
    Json(payload): Json<UpdateBudgetRequest>,
) -> impl IntoResponse {
    let period = match payload.period.as_deref() {
        Some(s) => match parse_period(s) {
            Some(period) => Some(period),
            None => return invalid_period(),
        },
        None => None,
    };

    if let Some(amount) = payload.amount {
        if validate_amount(amount).is_err() {
            return invalid_amount();
        }
    }

    if let Some(category_id) = payload.category_id {
        if let Err(response) = check_category_exists(&state, category_id).await {
            return response;
        }
    }

    let repo = BudgetRepository::new((*state.db).clone());

    let existing = match repo.find_by_id(id.into_inner()).await {
        Ok(Some(budget)) => budget,
        Ok(None) => return not_found(),
        Err(e) => {
            error!(error = %e, "Failed to fetch budget");
            return internal_error();
        }
    };

    if let Err(response) = ensure_owner(existing.user_id, &auth) {
        return response;
    }

    // Re-validate the window the record would end up with
    let (start, end) = effective_window(
        existing.start_date,
        existing.end_date,
        payload.start_date,
        payload.end_date,
    );
    if validate_window(start, end).is_err() {
        return invalid_window(start, end);
    }

    let input = UpdateBudgetInput {
        category_id: payload.category_id,
        amount: payload.amount,
        period,
        start_date: payload.start_date,
        end_date: payload.end_date,
    };

    match repo.update(id.into_inner(), input).await {
        Ok(Some(budget)) => {
            info!(
                user_id = %auth.user_id(),
                budget_id = %budget.id,
                "Budget updated"
            );
            (StatusCode::OK, Json(budget_json(&budget))).into_response()
        }
        Ok(None) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to update budget");
            internal_error()
        }
    }
}

/// DELETE `/budgets/{id}` - Delete one of the caller's budgets.
async fn delete_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<BudgetId>,
) -> impl IntoResponse {
    let repo = BudgetRepository::new((*state.db).clone());

    match repo.find_by_id(id.into_inner()).await {
        Ok(Some(budget)) => {
            if let Err(response) = ensure_owner(budget.user_id, &auth) {
                return response;
            }
        }
        Ok(None) => return not_found(),
        Err(e) => {
            error!(error = %e, "Failed to fetch budget");
            return internal_error();
        }
    }

    match repo.delete(id.into_inner()).await {
        Ok(true) => {
            info!(
                user_id = %auth.user_id(),
                budget_id = %id,
                "Budget deleted"
            );
            StatusCode::NO_CONTENT.into_response()
        }
        // already gone: deleting twice reports not-found, never an error
        Ok(false) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to delete budget");
            internal_error()
        }
    }
}

/// GET `/budgets/{id}/progress` - Spent/remaining for a single budget.
async fn budget_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<BudgetId>,
) -> impl IntoResponse {
    let repo = BudgetRepository::new((*state.db).clone());

    let budget = match repo.find_by_id(id.into_inner()).await {
        Ok(Some(budget)) => budget,
        Ok(None) => return not_found(),
        Err(e) => {
            error!(error = %e, "Failed to fetch budget");
            return internal_error();
        }
    };

    if let Err(response) = ensure_owner(budget.user_id, &auth) {
        return response;
    }

    let spent = match spent_for_budget(&state, budget.user_id, &budget).await {
        Ok(spent) => spent,
        Err(response) => return response,
    };

    let progress = compute_progress(budget.amount, spent, state.progress_thresholds);
    (StatusCode::OK, Json(progress_json(&budget, &progress))).into_response()
}

/// GET `/budgets/progress/all` - Progress across all currently-active
/// budgets.
///
/// When every active budget shares one window (the aligned-monthly common
/// case) a single grouped query produces all spent totals; otherwise each
/// budget falls back to its own window sum.
async fn bulk_progress(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = BudgetRepository::new((*state.db).clone());
    let user_id = auth.user_id().into_inner();
    let today = chrono::Utc::now().date_naive();

    let active = match repo.find_active(user_id, today).await {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "Failed to list active budgets");
            return internal_error();
        }
    };

    let mut results: Vec<serde_json::Value> = Vec::with_capacity(active.len());

    if let Some((start, end)) = uniform_window(&active) {
        let tx_repo = TransactionRepository::new((*state.db).clone());
        let totals: HashMap<Uuid, Decimal> =
            match tx_repo.sum_expenses_by_category(user_id, start, end).await {
                Ok(rows) => rows.into_iter().collect(),
                Err(e) => {
                    error!(error = %e, "Failed to sum expenses by category");
                    return internal_error();
                }
            };

        for budget in &active {
            let spent = totals
                .get(&budget.category_id)
                .copied()
                .unwrap_or(Decimal::ZERO);
            let progress = compute_progress(budget.amount, spent, state.progress_thresholds);
            results.push(progress_json(budget, &progress));
        }
    } else {
        for budget in &active {
            let spent = match spent_for_budget(&state, user_id, budget).await {
                Ok(spent) => spent,
                Err(response) => return response,
            };
            let progress = compute_progress(budget.amount, spent, state.progress_thresholds);
            results.push(progress_json(budget, &progress));
        }
    }

    (StatusCode::OK, Json(json!({ "progress": results }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn budget(start: NaiveDate, end: NaiveDate) -> budgets::Model {
        let now = chrono::Utc::now().fixed_offset();
        budgets::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            amount: dec!(500),
            period: BudgetPeriod::Monthly,
            start_date: start,
            end_date: end,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_parse_period() {
        assert_eq!(parse_period("monthly"), Some(BudgetPeriod::Monthly));
        assert_eq!(parse_period("YEARLY"), Some(BudgetPeriod::Yearly));
        assert_eq!(parse_period("weekly"), None);
    }

    #[test]
    fn test_uniform_window() {
        let july = (date(2025, 7, 1), date(2025, 7, 31));

        assert_eq!(uniform_window(&[]), None);
        assert_eq!(
            uniform_window(&[budget(july.0, july.1), budget(july.0, july.1)]),
            Some(july)
        );
        assert_eq!(
            uniform_window(&[
                budget(july.0, july.1),
                budget(date(2025, 1, 1), date(2025, 12, 31)),
            ]),
            None
        );
    }
}
