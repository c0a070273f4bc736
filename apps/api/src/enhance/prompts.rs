// Prompt constants for the Enhance module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::enhance::RewriteTarget;
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, NO_FABRICATION_INSTRUCTION};

pub const SUMMARY_SYSTEM: &str = "You are an expert resume writer. \
    You rewrite professional summaries to be concise, confident and specific.";

pub const BULLET_SYSTEM: &str = "You are an expert resume writer. \
    You rewrite resume bullet points to start with a strong action verb \
    and emphasise measurable impact.";

/// Replace `{role_clause}` and `{text}` before sending.
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Rewrite this professional summary in 2-4 sentences{role_clause}.

Return a JSON object with this EXACT schema:
{"text": "<rewritten summary>"}

Summary:
{text}"#;

/// Replace `{text}` before sending.
pub const BULLET_PROMPT_TEMPLATE: &str = r#"Rewrite this resume bullet as a single line of at most 30 words.

Return a JSON object with this EXACT schema:
{"text": "<rewritten bullet>"}

Bullet:
{text}"#;

/// Returns (system, user prompt) for a rewrite.
pub fn build(text: &str, target: &RewriteTarget) -> (String, String) {
    let (system, prompt) = match target {
        RewriteTarget::Summary { role } => {
            let role_clause = role
                .as_deref()
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(|r| format!(" for a {r} position"))
                .unwrap_or_default();
            (
                SUMMARY_SYSTEM,
                SUMMARY_PROMPT_TEMPLATE
                    .replace("{role_clause}", &role_clause)
                    .replace("{text}", text.trim()),
            )
        }
        RewriteTarget::Bullet => (
            BULLET_SYSTEM,
            BULLET_PROMPT_TEMPLATE.replace("{text}", text.trim()),
        ),
    };
    (
        format!("{system} {NO_FABRICATION_INSTRUCTION} {JSON_ONLY_SYSTEM}"),
        prompt,
    )
}
