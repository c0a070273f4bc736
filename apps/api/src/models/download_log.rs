use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Append-only audit record of a permitted download.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadLog {
    pub id: Uuid,
    pub account_id: Uuid,
    pub resume_id: Uuid,
    pub downloaded_at: DateTime<Utc>,
}

impl DownloadLog {
    pub fn new(account_id: Uuid, resume_id: Uuid, now: DateTime<Utc>) -> Self {
        DownloadLog {
            id: Uuid::new_v4(),
            account_id,
            resume_id,
            downloaded_at: now,
        }
    }
}
