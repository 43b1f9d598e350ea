//! Transaction management routes.

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
use fintrack_core::transaction::{TransactionType, validate_amount};
use fintrack_db::repositories::transaction::{
    CreateTransactionInput, TransactionFilter, TransactionRepository, UpdateTransactionInput,
};
use fintrack_db::CategoryRepository;
use fintrack_db::entities::{sea_orm_active_enums::TransactionKind, transactions};
use fintrack_shared::AppError;
use fintrack_shared::types::TransactionId;

/// Creates the transaction routes (requires auth middleware to be applied
/// externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route("/transactions/summary", get(monthly_summary))
        .route(
            "/transactions/{id}",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing transactions.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Filter by kind: income or expense.
    pub kind: Option<String>,
    /// Filter by category.
    pub category_id: Option<Uuid>,
    /// Inclusive lower bound on date.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on date.
    pub to: Option<NaiveDate>,
}

/// Query parameters for the monthly summary.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// Inclusive lower bound on date.
    pub from: NaiveDate,
    /// Inclusive upper bound on date.
    pub to: NaiveDate,
}

/// Request body for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Category ID.
    pub category_id: Uuid,
    /// Transaction kind: income or expense.
    pub kind: String,
    /// Amount; must be strictly positive.
    pub amount: Decimal,
    /// Description.
    pub description: String,
    /// Transaction date.
    pub date: NaiveDate,
    /// Optional notes.
    pub notes: Option<String>,
}

/// Request body for updating a transaction.
#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    /// New category ID.
    pub category_id: Option<Uuid>,
    /// New kind.
    pub kind: Option<String>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New description.
    pub description: Option<String>,
    /// New date.
    pub date: Option<NaiveDate>,
    /// New notes.
    pub notes: Option<String>,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Converts a kind string to the database enum via the domain type.
fn parse_kind(s: &str) -> Option<TransactionKind> {
    TransactionType::from_str(s).ok().map(Into::into)
}

/// Converts the database enum to its wire string.
fn kind_to_string(kind: &TransactionKind) -> String {
    TransactionType::from(kind.clone()).to_string()
}

/// Serializes a transaction for API responses.
fn transaction_json(t: &transactions::Model) -> serde_json::Value {
    json!({
        "id": t.id,
        "category_id": t.category_id,
        "kind": kind_to_string(&t.kind),
        "amount": t.amount.to_string(),
        "description": t.description,
        "date": t.date,
        "notes": t.notes,
        "created_at": t.created_at,
        "updated_at": t.updated_at
    })
}

fn internal_error() -> axum::response::Response {
    super::error_response(&AppError::Internal("An error occurred".to_string()))
}

fn not_found() -> axum::response::Response {
    super::error_response(&AppError::NotFound("Transaction not found".to_string()))
}

fn invalid_kind() -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "invalid_kind",
            "message": "Kind must be one of: income, expense",
            "details": [{ "field": "kind", "rule": "one_of: income, expense" }]
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

/// Rejects when the record belongs to someone else.
///
/// Repositories perform no authorization; this comparison is the ownership
/// boundary.
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

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/transactions` - List own transactions with optional filters.
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListTransactionsQuery>,
) -> impl IntoResponse {
    let kind = match query.kind.as_deref() {
        Some(s) => match parse_kind(s) {
            Some(kind) => Some(kind),
            None => return invalid_kind(),
        },
        None => None,
    };

    let filter = TransactionFilter {
        kind,
        category_id: query.category_id,
        date_from: query.from,
        date_to: query.to,
    };

    let repo = TransactionRepository::new((*state.db).clone());

    match repo.list(auth.user_id().into_inner(), filter).await {
        Ok(rows) => {
            let response: Vec<serde_json::Value> = rows.iter().map(transaction_json).collect();
            (StatusCode::OK, Json(json!({ "transactions": response }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list transactions");
            internal_error()
        }
    }
}

/// GET `/transactions/summary` - Monthly income/expense totals in a range.
async fn monthly_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SummaryQuery>,
) -> impl IntoResponse {
    if query.from > query.to {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_range",
                "message": "'from' must not be after 'to'",
                "details": [{ "field": "from", "rule": "not_after_to" }]
            })),
        )
            .into_response();
    }

    let repo = TransactionRepository::new((*state.db).clone());

    match repo
        .monthly_totals(auth.user_id().into_inner(), query.from, query.to)
        .await
    {
        Ok(totals) => {
            let months: Vec<serde_json::Value> = totals
                .iter()
                .map(|t| {
                    json!({
                        "month": t.month,
                        "income": t.income.to_string(),
                        "expense": t.expense.to_string()
                    })
                })
                .collect();
            (StatusCode::OK, Json(json!({ "months": months }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to compute monthly summary");
            internal_error()
        }
    }
}

/// POST `/transactions` - Create a transaction.
async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    let Some(kind) = parse_kind(&payload.kind) else {
        return invalid_kind();
    };

    if validate_amount(payload.amount).is_err() {
        return invalid_amount();
    }

    if let Err(response) = check_category_exists(&state, payload.category_id).await {
        return response;
    }

    let repo = TransactionRepository::new((*state.db).clone());

    let input = CreateTransactionInput {
        user_id: auth.user_id().into_inner(),
        category_id: payload.category_id,
        kind,
        amount: payload.amount,
        description: payload.description,
        date: payload.date,
        notes: payload.notes,
    };

    match repo.create(input).await {
        Ok(transaction) => {
            info!(
                user_id = %auth.user_id(),
                transaction_id = %transaction.id,
                "Transaction created"
            );
            (StatusCode::CREATED, Json(transaction_json(&transaction))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create transaction");
            internal_error()
        }
    }
}

/// GET `/transactions/{id}` - Fetch one of the caller's transactions.
async fn get_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<TransactionId>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());

    match repo.find_by_id(id.into_inner()).await {
        Ok(Some(transaction)) => {
            if let Err(response) = ensure_owner(transaction.user_id, &auth) {
                return response;
            }
            (StatusCode::OK, Json(transaction_json(&transaction))).into_response()
        }
        Ok(None) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to fetch transaction");
            internal_error()
        }
    }
}

/// PUT `/transactions/{id}` - Update one of the caller's transactions.
async fn update_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<TransactionId>,
    Json(payload): Json<UpdateTransactionRequest>,
) -> impl IntoResponse {
    let kind = match payload.kind.as_deref() {
        Some(s) => match parse_kind(s) {
            Some(kind) => Some(kind),
            None => return invalid_kind(),
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

    let repo = TransactionRepository::new((*state.db).clone());

    // Ownership is checked against the stored record before any mutation
    match repo.find_by_id(id.into_inner()).await {
        Ok(Some(existing)) => {
            if let Err(response) = ensure_owner(existing.user_id, &auth) {
                return response;
            }
        }
        Ok(None) => return not_found(),
        Err(e) => {
            error!(error = %e, "Failed to fetch transaction");
            return internal_error();
        }
    }

    let input = UpdateTransactionInput {
        category_id: payload.category_id,
        kind,
        amount: payload.amount,
        description: payload.description,
        date: payload.date,
        notes: payload.notes.map(Some),
    };

    match repo.update(id.into_inner(), input).await {
        Ok(Some(transaction)) => {
            info!(
                user_id = %auth.user_id(),
                transaction_id = %transaction.id,
                "Transaction updated"
            );
            (StatusCode::OK, Json(transaction_json(&transaction))).into_response()
        }
        Ok(None) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to update transaction");
            internal_error()
        }
    }
}

/// DELETE `/transactions/{id}` - Delete one of the caller's transactions.
async fn delete_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<TransactionId>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());

    match repo.find_by_id(id.into_inner()).await {
        Ok(Some(existing)) => {
            if let Err(response) = ensure_owner(existing.user_id, &auth) {
                return response;
            }
        }
        Ok(None) => return not_found(),
        Err(e) => {
            error!(error = %e, "Failed to fetch transaction");
            return internal_error();
        }
    }

    match repo.delete(id.into_inner()).await {
        Ok(true) => {
            info!(
                user_id = %auth.user_id(),
                transaction_id = %id,
                "Transaction deleted"
            );
            StatusCode::NO_CONTENT.into_response()
        }
        // already gone: deleting twice reports not-found, never an error
        Ok(false) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to delete transaction");
            internal_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind("income"), Some(TransactionKind::Income));
        assert_eq!(parse_kind("EXPENSE"), Some(TransactionKind::Expense));
        assert_eq!(parse_kind("transfer"), None);
    }

    #[test]
    fn test_kind_to_string_round_trip() {
        for kind in [TransactionKind::Income, TransactionKind::Expense] {
            assert_eq!(parse_kind(&kind_to_string(&kind)), Some(kind));
        }
    }
}
