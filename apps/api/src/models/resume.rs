use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

pub const DEFAULT_TITLE: &str = "Untitled Resume";

/// Days a soft-deleted resume stays restorable before the purge sweep removes it.
pub const TRASH_RETENTION_DAYS: i64 = 30;

/// Who a resume belongs to. Guest drafts start `Unclaimed` and become `Owned`
/// on the first authenticated write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Owned(Uuid),
    Unclaimed,
}

impl Owner {
    pub fn from_column(owner_id: Option<Uuid>) -> Self {
        owner_id.map_or(Owner::Unclaimed, Owner::Owned)
    }

    pub fn account_id(&self) -> Option<Uuid> {
        match self {
            Owner::Owned(id) => Some(*id),
            Owner::Unclaimed => None,
        }
    }
}

/// A stored resume document.
///
/// The deleted flag is derived from `deleted_at`, so a resume can never be
/// flagged deleted without a deletion instant (or the reverse).
#[derive(Debug, Clone, PartialEq)]
pub struct Resume {
    pub id: Uuid,
    pub owner: Owner,
    pub title: String,
    /// Full editor state, stored as an opaque blob.
    pub data: Value,
    deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resume {
    pub fn new(owner: Owner, title: Option<String>, data: Value, now: DateTime<Utc>) -> Self {
        Resume {
            id: Uuid::new_v4(),
            owner,
            title: normalize_title(title),
            data,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds a resume from persisted columns.
    pub fn from_parts(
        id: Uuid,
        owner: Owner,
        title: String,
        data: Value,
        deleted_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Resume {
            id,
            owner,
            title,
            data,
            deleted_at,
            created_at,
            updated_at,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Merges the provided fields. Absent fields keep their stored value.
    pub fn apply_update(&mut self, title: Option<String>, data: Option<Value>, now: DateTime<Utc>) {
        if let Some(title) = title {
            self.title = normalize_title(Some(title));
        }
        if let Some(data) = data {
            self.data = data;
        }
        self.updated_at = now;
    }

    /// Moves the resume to the trash. Deleting twice keeps the first deletion instant.
    pub fn soft_delete(&mut self, now: DateTime<Utc>) {
        if self.deleted_at.is_none() {
            self.deleted_at = Some(now);
            self.updated_at = now;
        }
    }

    /// Takes the resume out of the trash. Returns false if it was not deleted.
    pub fn restore(&mut self, now: DateTime<Utc>) -> bool {
        if self.deleted_at.take().is_some() {
            self.updated_at = now;
            true
        } else {
            false
        }
    }
}

/// Resumes deleted before this instant are past retention.
pub fn purge_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(TRASH_RETENTION_DAYS)
}

fn normalize_title(title: Option<String>) -> String {
    match title {
        Some(t) if !t.trim().is_empty() => t.trim().to_string(),
        _ => DEFAULT_TITLE.to_string(),
    }
}

/// Client-facing representation of a resume.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeView {
    pub id: Uuid,
    pub owner_id: Option<Uuid>,
    pub title: String,
    pub data: Value,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Resume> for ResumeView {
    fn from(resume: &Resume) -> Self {
        ResumeView {
            id: resume.id,
            owner_id: resume.owner.account_id(),
            title: resume.title.clone(),
            data: resume.data.clone(),
            is_deleted: resume.is_deleted(),
            deleted_at: resume.deleted_at,
            created_at: resume.created_at,
            updated_at: resume.updated_at,
        }
    }
}
