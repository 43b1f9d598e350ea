//! Category routes.
//!
//! Reads are public; writes require the admin role. End users never mutate
//! categories in the common path - the seeder installs the default set.

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use fintrack_core::auth::UserRole;
use fintrack_core::transaction::TransactionType;
use fintrack_db::repositories::category::{
    CategoryError, CategoryRepository, CreateCategoryInput, UpdateCategoryInput,
};
use fintrack_db::entities::{categories, sea_orm_active_enums::TransactionKind};
use fintrack_shared::AppError;
use fintrack_shared::types::CategoryId;

/// Creates the public, read-only category routes.
pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/categories/{id}", get(get_category))
}

/// Creates the admin-only category write routes (requires auth middleware
/// to be applied externally).
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", post(create_category))
        .route(
            "/categories/{id}",
            put(update_category).delete(delete_category),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing categories.
#[derive(Debug, Deserialize)]
pub struct ListCategoriesQuery {
    /// Filter by kind: income or expense.
    pub kind: Option<String>,
}

/// Request body for creating a category.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    /// Category name (unique).
    pub name: String,
    /// Kind: income or expense.
    pub kind: String,
    /// Optional icon identifier.
    pub icon: Option<String>,
    /// Optional display color.
    pub color: Option<String>,
}

/// Request body for updating a category.
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    /// New name.
    pub name: Option<String>,
    /// New kind.
    pub kind: Option<String>,
    /// New icon.
    pub icon: Option<String>,
    /// New color.
    pub color: Option<String>,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Converts a kind string to the database enum via the domain type.
fn parse_kind(s: &str) -> Option<TransactionKind> {
    TransactionType::from_str(s).ok().map(Into::into)
}

/// Serializes a category for API responses.
fn category_json(c: &categories::Model) -> serde_json::Value {
    let kind = match c.kind {
        TransactionKind::Income => "income",
        TransactionKind::Expense => "expense",
    };
    json!({
        "id": c.id,
        "name": c.name,
        "kind": kind,
        "icon": c.icon,
        "color": c.color
    })
}

fn internal_error() -> axum::response::Response {
    super::error_response(&AppError::Internal("An error occurred".to_string()))
}

fn not_found() -> axum::response::Response {
    super::error_response(&AppError::NotFound("Category not found".to_string()))
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

/// Rejects callers whose role cannot manage the global category set.
fn check_admin(auth: &AuthUser) -> Result<(), axum::response::Response> {
    let can_manage = UserRole::from_str(auth.role())
        .map(|role| role.can_manage_categories())
        .unwrap_or(false);

    if can_manage {
        Ok(())
    } else {
        Err(super::error_response(&AppError::Forbidden(
            "Admin role required".to_string(),
        )))
    }
}

/// Maps category repository errors to HTTP responses.
fn map_category_error(e: &CategoryError) -> axum::response::Response {
    match e {
        CategoryError::DuplicateName(name) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "duplicate_name",
                "message": format!("Category name '{name}' already exists")
            })),
        )
            .into_response(),
        CategoryError::Database(_) => internal_error(),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/categories` - List categories, optionally filtered by kind.
async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<ListCategoriesQuery>,
) -> impl IntoResponse {
    let repo = CategoryRepository::new((*state.db).clone());

    let result = match query.kind.as_deref() {
        Some(s) => match parse_kind(s) {
            Some(kind) => repo.find_by_kind(kind).await,
            None => return invalid_kind(),
        },
        None => repo.find_all().await,
    };

    match result {
        Ok(rows) => {
            let response: Vec<serde_json::Value> = rows.iter().map(category_json).collect();
            (StatusCode::OK, Json(json!({ "categories": response }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list categories");
            internal_error()
        }
    }
}

/// GET `/categories/{id}` - Fetch a category.
async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> impl IntoResponse {
    let repo = CategoryRepository::new((*state.db).clone());

    match repo.find_by_id(id.into_inner()).await {
        Ok(Some(category)) => (StatusCode::OK, Json(category_json(&category))).into_response(),
        Ok(None) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to fetch category");
            internal_error()
        }
    }
}

/// POST `/categories` - Create a category (admin only).
async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> impl IntoResponse {
    if let Err(response) = check_admin(&auth) {
        return response;
    }

    let Some(kind) = parse_kind(&payload.kind) else {
        return invalid_kind();
    };

    let repo = CategoryRepository::new((*state.db).clone());

    let input = CreateCategoryInput {
        name: payload.name,
        kind,
        icon: payload.icon,
        color: payload.color,
    };

    match repo.create(input).await {
        Ok(category) => {
            info!(category_id = %category.id, name = %category.name, "Category created");
            (StatusCode::CREATED, Json(category_json(&category))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create category");
            map_category_error(&e)
        }
    }
}

/// PUT `/categories/{id}` - Update a category (admin only).
async fn update_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<CategoryId>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> impl IntoResponse {
    if let Err(response) = check_admin(&auth) {
        return response;
    }

    let kind = match payload.kind.as_deref() {
        Some(s) => match parse_kind(s) {
            Some(kind) => Some(kind),
            None => return invalid_kind(),
        },
        None => None,
    };

    let repo = CategoryRepository::new((*state.db).clone());

    let input = UpdateCategoryInput {
        name: payload.name,
        kind,
        icon: payload.icon.map(Some),
        color: payload.color.map(Some),
    };

    match repo.update(id.into_inner(), input).await {
        Ok(Some(category)) => {
            info!(category_id = %category.id, "Category updated");
            (StatusCode::OK, Json(category_json(&category))).into_response()
        }
        Ok(None) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to update category");
            map_category_error(&e)
        }
    }
}

/// DELETE `/categories/{id}` - Delete a category (admin only).
async fn delete_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<CategoryId>,
) -> impl IntoResponse {
    if let Err(response) = check_admin(&auth) {
        return response;
    }

    let repo = CategoryRepository::new((*state.db).clone());

    match repo.delete(id.into_inner()).await {
        Ok(true) => {
            info!(category_id = %id, "Category deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(false) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to delete category");
            map_category_error(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind("income"), Some(TransactionKind::Income));
        assert_eq!(parse_kind("Expense"), Some(TransactionKind::Expense));
        assert_eq!(parse_kind("savings"), None);
    }
}
