//! Axum route handlers for the Auth API.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Deserialize;

use crate::auth::extractor::AuthUser;
use crate::auth::service::{
    authenticate, recover_username, register, AuthResponse, LoginRequest, RecoverUsernameResponse,
    RegisterRequest,
};
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::PublicAccount;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ForgotRequest {
    pub email: String,
}

/// POST /api/v1/auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let response = register(state.accounts.as_ref(), &state.tokens, request, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = authenticate(state.accounts.as_ref(), &state.tokens, request, Utc::now()).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/forgot
///
/// Returns the username registered to an email.
pub async fn handle_forgot(
    State(state): State<AppState>,
    AppJson(request): AppJson<ForgotRequest>,
) -> Result<Json<RecoverUsernameResponse>, AppError> {
    Ok(Json(recover_username(state.accounts.as_ref(), &request.email).await?))
}

/// GET /api/v1/auth/me
pub async fn handle_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<PublicAccount>, AppError> {
    let account = state
        .accounts
        .find_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(PublicAccount::from(&account)))
}
