use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::entitlement::plans::apply_subscription;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::PublicAccount;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub plan: String,
    pub coupon: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub message: String,
    pub user: PublicAccount,
}

/// POST /api/v1/users/subscribe
///
/// Callers may only subscribe themselves unless they are an admin.
pub async fn handle_subscribe(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(request): AppJson<SubscribeRequest>,
) -> Result<Json<SubscribeResponse>, AppError> {
    if request.user_id != user.id && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Cannot change another user's subscription".to_string(),
        ));
    }

    let now = Utc::now();
    let subscription = apply_subscription(&request.plan, request.coupon.as_deref(), now)?;

    let account = state
        .accounts
        .update_subscription(request.user_id, &subscription, now)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    info!(
        "Account {} subscribed ({:?}) until {:?}",
        account.id, subscription.subscription_type, subscription.subscription_expiry
    );

    Ok(Json(SubscribeResponse {
        message: "Subscription activated".to_string(),
        user: PublicAccount::from(&account),
    }))
}
