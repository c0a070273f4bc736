//! Storage seams.
//!
//! Handlers and services only see these traits. `AppState` carries them as
//! `Arc<dyn …>`; production wires in [`postgres::PgStore`], tests use the
//! in-memory store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Account, AccountStatus, DownloadLog, Lead, NewAccount, Resume, Subscription};

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Inserts a new account. Duplicate username or email yields `AppError::Conflict`.
    async fn insert(&self, new_account: NewAccount, now: DateTime<Utc>) -> Result<Account, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AppError>;

    /// Matches either the username or the (case-insensitive) email.
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Account>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError>;

    async fn username_or_email_taken(&self, username: &str, email: &str) -> Result<bool, AppError>;

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AppError>;

    /// Atomically increments `download_count` if it is below `limit`.
    /// Returns the new count, or `None` when the limit was already reached.
    async fn increment_downloads_below(&self, id: Uuid, limit: i32) -> Result<Option<i32>, AppError>;

    async fn update_subscription(
        &self,
        id: Uuid,
        subscription: &Subscription,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, AppError>;

    async fn set_status(
        &self,
        id: Uuid,
        status: AccountStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, AppError>;

    /// All accounts, newest first.
    async fn list(&self) -> Result<Vec<Account>, AppError>;
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn insert(&self, resume: &Resume) -> Result<(), AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<Resume>, AppError>;

    /// Writes the full record back, replacing the stored document with the same id.
    async fn save(&self, resume: &Resume) -> Result<(), AppError>;

    /// Returns false if nothing was stored under `id`.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// Non-deleted resumes of an owner, most recently updated first.
    async fn list_active(&self, owner_id: Uuid) -> Result<Vec<Resume>, AppError>;

    /// Deleted resumes of an owner, most recently deleted first.
    async fn list_deleted(&self, owner_id: Uuid) -> Result<Vec<Resume>, AppError>;

    /// Permanently removes deleted resumes whose `deleted_at` is before `cutoff`.
    async fn purge_deleted_before(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError>;
}

#[async_trait]
pub trait DownloadLogStore: Send + Sync {
    async fn append(&self, entry: &DownloadLog) -> Result<(), AppError>;
}

#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn insert(&self, lead: &Lead) -> Result<(), AppError>;

    /// All leads, newest first.
    async fn list(&self) -> Result<Vec<Lead>, AppError>;
}
