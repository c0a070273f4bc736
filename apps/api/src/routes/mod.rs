pub mod health;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::admin::handlers as admin;
use crate::auth::handlers as auth;
use crate::enhance::handlers as enhance;
use crate::entitlement::handlers as entitlement;
use crate::leads::handlers as leads;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Credentials
        .route("/api/v1/auth/signup", post(auth::handle_signup))
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/forgot", post(auth::handle_forgot))
        .route("/api/v1/auth/me", get(auth::handle_me))
        // Resumes
        .route(
            "/api/v1/resumes",
            get(resumes::handle_list).post(resumes::handle_create),
        )
        .route("/api/v1/resumes/trash/history", get(resumes::handle_trash))
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get)
                .put(resumes::handle_update)
                .delete(resumes::handle_soft_delete),
        )
        .route("/api/v1/resumes/:id/restore", post(resumes::handle_restore))
        .route(
            "/api/v1/resumes/:id/permanent",
            delete(resumes::handle_delete_permanently),
        )
        .route("/api/v1/resumes/:id/download", post(resumes::handle_download))
        .route("/api/v1/resumes/:id/layout", get(resumes::handle_layout))
        // Entitlement
        .route("/api/v1/users/subscribe", post(entitlement::handle_subscribe))
        // Enhance
        .route("/api/v1/enhance/summary", post(enhance::handle_enhance_summary))
        .route("/api/v1/enhance/bullet", post(enhance::handle_enhance_bullet))
        // Leads & admin
        .route("/api/v1/leads", post(leads::handle_create_lead))
        .route("/api/v1/admin/users", get(admin::handle_list_users))
        .route("/api/v1/admin/users/:id/status", patch(admin::handle_set_status))
        .route("/api/v1/admin/leads", get(admin::handle_list_leads))
        .with_state(state)
}
