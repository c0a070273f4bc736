//! Contact-form leads captured from the landing page.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::validation::{validate_email, validate_mobile, validate_required};
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::Lead;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LeadRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub mobile: String,
}

#[derive(Debug, Serialize)]
pub struct LeadResponse {
    pub message: String,
    pub lead: Lead,
}

fn validate_lead(request: &LeadRequest) -> Result<(), AppError> {
    validate_required("name", &request.name)?;
    validate_required("email", &request.email)?;
    validate_required("mobile", &request.mobile)?;
    validate_email(request.email.trim())?;
    validate_mobile(request.mobile.trim())
}

/// POST /api/v1/leads
pub async fn handle_create_lead(
    State(state): State<AppState>,
    AppJson(request): AppJson<LeadRequest>,
) -> Result<(StatusCode, Json<LeadResponse>), AppError> {
    validate_lead(&request)?;

    let lead = Lead {
        id: Uuid::new_v4(),
        name: request.name.trim().to_string(),
        email: request.email.trim().to_lowercase(),
        mobile: request.mobile.trim().to_string(),
        created_at: Utc::now(),
    };
    state.leads.insert(&lead).await?;
    info!("Captured lead {}", lead.id);

    Ok((
        StatusCode::CREATED,
        Json(LeadResponse {
            message: "Thanks! We will be in touch soon.".to_string(),
            lead,
        }),
    ))
}
