//! Authentication routes for login, register, token refresh, and password
//! change.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use fintrack_core::auth::{hash_password, verify_password};
use fintrack_db::UserRepository;
use fintrack_db::entities::{sea_orm_active_enums::UserRole, users};
use fintrack_shared::AppError;
use fintrack_shared::auth::{
    ChangePasswordRequest, LoginRequest, LoginResponse, RefreshRequest, RegisterRequest, UserInfo,
};
use fintrack_shared::types::UserId;

use crate::middleware::AuthUser;

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/refresh", post(refresh))
}

/// Creates the auth routes that require an authenticated caller (auth
/// middleware applied externally).
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/password", axum::routing::put(change_password))
}

/// Role string stored in token claims.
fn role_to_string(role: &UserRole) -> String {
    fintrack_core::auth::UserRole::from(role.clone()).to_string()
}

/// Issues a token pair and builds the auth response for a user.
fn build_auth_response(
    state: &AppState,
    user: users::Model,
) -> Result<LoginResponse, axum::response::Response> {
    let role = role_to_string(&user.role);
    let user_id = UserId::from_uuid(user.id);

    let access_token = state
        .jwt_service
        .generate_access_token(user_id, &role)
        .map_err(|e| {
            error!(error = %e, "Failed to generate access token");
            internal_error()
        })?;

    let refresh_token = state
        .jwt_service
        .generate_refresh_token(user_id, &role)
        .map_err(|e| {
            error!(error = %e, "Failed to generate refresh token");
            internal_error()
        })?;

    Ok(LoginResponse {
        user: UserInfo {
            id: user_id,
            email: user.email,
            full_name: user.full_name,
            role,
        },
        access_token,
        refresh_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    })
}

fn internal_error() -> axum::response::Response {
    super::error_response(&AppError::Internal("An error occurred".to_string()))
}

/// POST /auth/login - Authenticate user and return tokens.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    // Find user by email
    let user = match user_repo.find_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(email = %payload.email, "Login attempt for non-existent user");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_credentials",
                    "message": "Invalid email or password"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return internal_error();
        }
    };

    // Check if user is active
    if !user.is_active {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "account_disabled",
                "message": "This account has been disabled"
            })),
        )
            .into_response();
    }

    // Verify password
    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_credentials",
                    "message": "Invalid email or password"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error();
        }
    }

    info!(user_id = %user.id, "User logged in successfully");

    match build_auth_response(&state, user) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(response) => response,
    }
}

/// POST /auth/register - Register a new user.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    if payload.password.len() < 8 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "weak_password",
                "message": "Password must be at least 8 characters",
                "details": [{ "field": "password", "rule": "min_length_8" }]
            })),
        )
            .into_response();
    }

    let user_repo = UserRepository::new((*state.db).clone());

    // Check if email already exists
    match user_repo.email_exists(&payload.email).await {
        Ok(true) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "email_exists",
                    "message": "An account with this email already exists"
                })),
            )
                .into_response();
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "Database error checking email");
            return internal_error();
        }
    }

    // Hash password
    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return internal_error();
        }
    };

    // Create user; registration always yields the regular role
    let user = match user_repo
        .create(
            &payload.email,
            &password_hash,
            &payload.full_name,
            UserRole::User,
        )
        .await
    {
        Ok(u) => u,
        Err(e) => {
            error!(error = %e, "Failed to create user");
            return internal_error();
        }
    };

    info!(user_id = %user.id, "User registered");

    match build_auth_response(&state, user) {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(response) => response,
    }
}

/// POST /auth/refresh - Rotate tokens from a valid refresh token.
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> impl IntoResponse {
    let claims = match state.jwt_service.validate_token(&payload.refresh_token) {
        Ok(claims) => claims,
        Err(fintrack_shared::JwtError::Expired) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "token_expired",
                    "message": "Refresh token has expired"
                })),
            )
                .into_response();
        }
        Err(_) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_token",
                    "message": "Invalid or malformed token"
                })),
            )
                .into_response();
        }
    };

    let user_repo = UserRepository::new((*state.db).clone());

    // Re-check the account before minting fresh tokens
    let user = match user_repo.find_by_id(claims.user_id().into_inner()).await {
        Ok(Some(u)) if u.is_active => u,
        Ok(_) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "account_disabled",
                    "message": "This account is no longer active"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error during token refresh");
            return internal_error();
        }
    };

    match build_auth_response(&state, user) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(response) => response,
    }
}

/// PUT /auth/password - Change the caller's password.
async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> impl IntoResponse {
    if payload.new_password.len() < 8 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "weak_password",
                "message": "Password must be at least 8 characters",
                "details": [{ "field": "new_password", "rule": "min_length_8" }]
            })),
        )
            .into_response();
    }

    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_id(auth.user_id().into_inner()).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return super::error_response(&AppError::NotFound("User not found".to_string()));
        }
        Err(e) => {
            error!(error = %e, "Database error during password change");
            return internal_error();
        }
    };

    // The current password must check out before anything is replaced
    match verify_password(&payload.current_password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Password change with wrong current password");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_credentials",
                    "message": "Current password is incorrect"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error();
        }
    }

    let password_hash = match hash_password(&payload.new_password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return internal_error();
        }
    };

    match user_repo.update_password(user.id, &password_hash).await {
        Ok(Some(_)) => {
            info!(user_id = %user.id, "Password changed");
            (
                StatusCode::OK,
                Json(json!({ "message": "Password updated" })),
            )
                .into_response()
        }
        Ok(None) => super::error_response(&AppError::NotFound("User not found".to_string())),
        Err(e) => {
            error!(error = %e, "Failed to update password");
            internal_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_to_string() {
        assert_eq!(role_to_string(&UserRole::User), "user");
        assert_eq!(role_to_string(&UserRole::Admin), "admin");
    }
}
