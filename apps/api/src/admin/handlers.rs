use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::{AccountStatus, Lead, PublicAccount};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: String,
    pub user: PublicAccount,
}

/// GET /api/v1/admin/users
pub async fn handle_list_users(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<PublicAccount>>, AppError> {
    user.require_admin()?;
    let accounts = state.accounts.list().await?;
    Ok(Json(accounts.iter().map(PublicAccount::from).collect()))
}

/// PATCH /api/v1/admin/users/:id/status
///
/// Blocked accounts can no longer log in. Existing tokens stay valid until expiry.
pub async fn handle_set_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    AppJson(request): AppJson<StatusRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    user.require_admin()?;
    let status: AccountStatus = request
        .status
        .trim()
        .to_lowercase()
        .parse()
        .map_err(|_| AppError::Validation("status must be 'active' or 'blocked'".to_string()))?;
    if id == user.id && status == AccountStatus::Blocked {
        return Err(AppError::Validation("Admins cannot block themselves".to_string()));
    }

    let account = state
        .accounts
        .set_status(id, status, Utc::now())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    info!("Admin {} set account {} to {}", user.id, id, status.as_str());

    Ok(Json(StatusResponse {
        message: format!("User is now {}", status.as_str()),
        user: PublicAccount::from(&account),
    }))
}

/// GET /api/v1/admin/leads
pub async fn handle_list_leads(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Lead>>, AppError> {
    user.require_admin()?;
    Ok(Json(state.leads.list().await?))
}
