use std::sync::Arc;

use crate::auth::TokenService;
use crate::enhance::Rewriter;
use crate::store::{AccountStore, DownloadLogStore, LeadStore, ResumeStore};

/// Shared application state injected into all route handlers via Axum extractors.
///
/// In production every store is the same `PgStore`; tests swap in the
/// in-memory store.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountStore>,
    pub resumes: Arc<dyn ResumeStore>,
    pub download_logs: Arc<dyn DownloadLogStore>,
    pub leads: Arc<dyn LeadStore>,
    pub tokens: TokenService,
    /// Pluggable text rewriter. Default: LlmRewriter.
    pub rewriter: Arc<dyn Rewriter>,
}
