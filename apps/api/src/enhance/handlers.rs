use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::AuthUser;
use crate::enhance::RewriteTarget;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

/// Longest input accepted for a single rewrite.
pub const MAX_INPUT_CHARS: usize = 4000;

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    #[serde(default)]
    pub text: String,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BulletRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct EnhanceResponse {
    pub text: String,
}

fn validate_input(text: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation("text is required".to_string()));
    }
    if text.chars().count() > MAX_INPUT_CHARS {
        return Err(AppError::Validation(format!(
            "text must be at most {MAX_INPUT_CHARS} characters"
        )));
    }
    Ok(())
}

/// POST /api/v1/enhance/summary
pub async fn handle_enhance_summary(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(request): AppJson<SummaryRequest>,
) -> Result<Json<EnhanceResponse>, AppError> {
    validate_input(&request.text)?;
    let target = RewriteTarget::Summary { role: request.role };
    let text = state.rewriter.rewrite(&request.text, &target).await?;
    info!("Enhanced summary for account {}", user.id);
    Ok(Json(EnhanceResponse { text }))
}

/// POST /api/v1/enhance/bullet
pub async fn handle_enhance_bullet(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(request): AppJson<BulletRequest>,
) -> Result<Json<EnhanceResponse>, AppError> {
    validate_input(&request.text)?;
    let text = state
        .rewriter
        .rewrite(&request.text, &RewriteTarget::Bullet)
        .await?;
    info!("Enhanced bullet for account {}", user.id);
    Ok(Json(EnhanceResponse { text }))
}
