//! Axum route handlers for the Resume API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::auth::{AuthUser, MaybeAuthUser};
use crate::entitlement::gate::{check_download, DownloadGrant};
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::{Resume, ResumeData, ResumeView};
use crate::render::{render, PageConfig, RenderMode, RenderedResume};
use crate::resumes::ownership::Caller;
use crate::resumes::service;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ResumeRequest {
    pub title: Option<String>,
    pub data: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ResumeMessage {
    pub message: String,
    pub resume: ResumeView,
}

#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub message: String,
    #[serde(flatten)]
    pub grant: DownloadGrant,
}

#[derive(Debug, Deserialize)]
pub struct LayoutQuery {
    #[serde(default)]
    pub mode: RenderMode,
}

fn views(resumes: &[Resume]) -> Vec<ResumeView> {
    resumes.iter().map(ResumeView::from).collect()
}

/// GET /api/v1/resumes
pub async fn handle_list(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ResumeView>>, AppError> {
    let resumes = service::list_for_owner(state.resumes.as_ref(), user.id).await?;
    Ok(Json(views(&resumes)))
}

/// GET /api/v1/resumes/trash/history
pub async fn handle_trash(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ResumeView>>, AppError> {
    let resumes = service::list_trash(state.resumes.as_ref(), user.id).await?;
    Ok(Json(views(&resumes)))
}

/// POST /api/v1/resumes
///
/// Works without a token; the draft is then unclaimed.
pub async fn handle_create(
    State(state): State<AppState>,
    user: MaybeAuthUser,
    AppJson(request): AppJson<ResumeRequest>,
) -> Result<(StatusCode, Json<ResumeView>), AppError> {
    let resume = service::create(
        state.resumes.as_ref(),
        &user.caller(),
        request.title,
        request.data,
        Utc::now(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(ResumeView::from(&resume))))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get(
    State(state): State<AppState>,
    user: MaybeAuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeView>, AppError> {
    let resume = service::get(state.resumes.as_ref(), id, &user.caller()).await?;
    Ok(Json(ResumeView::from(&resume)))
}

/// PUT /api/v1/resumes/:id
pub async fn handle_update(
    State(state): State<AppState>,
    user: MaybeAuthUser,
    Path(id): Path<Uuid>,
    AppJson(request): AppJson<ResumeRequest>,
) -> Result<Json<ResumeView>, AppError> {
    let resume = service::update(
        state.resumes.as_ref(),
        id,
        &user.caller(),
        request.title,
        request.data,
        Utc::now(),
    )
    .await?;
    Ok(Json(ResumeView::from(&resume)))
}

/// DELETE /api/v1/resumes/:id: moves the resume to the trash.
pub async fn handle_soft_delete(
    State(state): State<AppState>,
    user: MaybeAuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeMessage>, AppError> {
    let resume = service::soft_delete(state.resumes.as_ref(), id, &user.caller(), Utc::now()).await?;
    Ok(Json(ResumeMessage {
        message: "Resume moved to trash".to_string(),
        resume: ResumeView::from(&resume),
    }))
}

/// POST /api/v1/resumes/:id/restore
pub async fn handle_restore(
    State(state): State<AppState>,
    user: MaybeAuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeMessage>, AppError> {
    let resume = service::restore(state.resumes.as_ref(), id, &user.caller(), Utc::now()).await?;
    Ok(Json(ResumeMessage {
        message: "Resume restored".to_string(),
        resume: ResumeView::from(&resume),
    }))
}

/// DELETE /api/v1/resumes/:id/permanent
pub async fn handle_delete_permanently(
    State(state): State<AppState>,
    user: MaybeAuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    service::delete_permanently(state.resumes.as_ref(), id, &user.caller()).await?;
    Ok(Json(serde_json::json!({ "message": "Resume permanently deleted" })))
}

/// POST /api/v1/resumes/:id/download
///
/// Gate only: the client rasterizes the PDF once this succeeds.
pub async fn handle_download(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DownloadResponse>, AppError> {
    let (resume, _) =
        service::load_authorized(state.resumes.as_ref(), id, &Caller::from(user)).await?;
    if resume.is_deleted() {
        return Err(AppError::NotFound(format!("Resume {id} not found")));
    }

    let account = state
        .accounts
        .find_by_id(user.id)
        .await?
        .ok_or_else(AppError::unauthorized)?;

    let grant = check_download(
        state.accounts.as_ref(),
        state.download_logs.as_ref(),
        &account,
        resume.id,
        Utc::now(),
    )
    .await?;

    Ok(Json(DownloadResponse {
        message: "Download permitted".to_string(),
        grant,
    }))
}

/// GET /api/v1/resumes/:id/layout?mode=screen|paginated
pub async fn handle_layout(
    State(state): State<AppState>,
    user: MaybeAuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<LayoutQuery>,
) -> Result<Json<RenderedResume>, AppError> {
    let resume = service::get(state.resumes.as_ref(), id, &user.caller()).await?;
    let data = ResumeData::from_value(&resume.data)?;
    let config = PageConfig::default();

    let rendered = tokio::task::spawn_blocking(move || render(&data, query.mode, &config))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in layout: {e}")))?;

    Ok(Json(rendered))
}
