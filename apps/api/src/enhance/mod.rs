// AI text enhancement for summaries and bullets.
// The backend is pluggable; AppState carries it as Arc<dyn Rewriter>.

pub mod handlers;
pub mod prompts;

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::AppError;
use crate::llm_client::LlmClient;

/// What kind of resume text is being rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteTarget {
    /// Professional summary, optionally aimed at a target role.
    Summary { role: Option<String> },
    Bullet,
}

/// Rewrites a piece of resume text.
#[async_trait]
pub trait Rewriter: Send + Sync {
    async fn rewrite(&self, text: &str, target: &RewriteTarget) -> Result<String, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmRewriter: default implementation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RewriteReply {
    text: String,
}

pub struct LlmRewriter(pub LlmClient);

#[async_trait]
impl Rewriter for LlmRewriter {
    async fn rewrite(&self, text: &str, target: &RewriteTarget) -> Result<String, AppError> {
        let (system, prompt) = prompts::build(text, target);
        let reply: RewriteReply = self.0.call_json(&prompt, &system).await?;
        let rewritten = reply.text.trim();
        if rewritten.is_empty() {
            return Err(AppError::Llm("Model returned an empty rewrite".to_string()));
        }
        Ok(rewritten.to_string())
    }
}
