//! In-memory store used by unit and router tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    Account, AccountStatus, DownloadLog, Lead, NewAccount, Role, Resume, Subscription,
};
use crate::store::{AccountStore, DownloadLogStore, LeadStore, ResumeStore};

#[derive(Default)]
struct Inner {
    accounts: HashMap<Uuid, Account>,
    resumes: HashMap<Uuid, Resume>,
    download_logs: Vec<DownloadLog>,
    leads: Vec<Lead>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
    fail_download_logs: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent download-log append fail.
    pub fn break_download_logs(&self) {
        self.fail_download_logs.store(true, Ordering::SeqCst);
    }

    pub async fn download_logs(&self) -> Vec<DownloadLog> {
        self.inner.lock().await.download_logs.clone()
    }

    pub async fn resume_count(&self) -> usize {
        self.inner.lock().await.resumes.len()
    }

    /// Overwrites the role of an existing account.
    pub async fn set_role(&self, id: Uuid, role: Role) {
        if let Some(account) = self.inner.lock().await.accounts.get_mut(&id) {
            account.role = role;
        }
    }

    pub async fn set_download_count(&self, id: Uuid, count: i32) {
        if let Some(account) = self.inner.lock().await.accounts.get_mut(&id) {
            account.download_count = count;
        }
    }

    /// Stores a resume as-is, bypassing the service layer.
    pub async fn put_resume(&self, resume: Resume) {
        self.inner.lock().await.resumes.insert(resume.id, resume);
    }
}

fn matches_email(account: &Account, email: &str) -> bool {
    account.email.eq_ignore_ascii_case(email)
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn insert(&self, new_account: NewAccount, now: DateTime<Utc>) -> Result<Account, AppError> {
        let mut inner = self.inner.lock().await;
        let taken = inner.accounts.values().any(|a| {
            a.username == new_account.username || matches_email(a, &new_account.email)
        });
        if taken {
            return Err(AppError::Conflict("Username or email already exists".to_string()));
        }
        let account = Account {
            id: Uuid::new_v4(),
            username: new_account.username,
            email: new_account.email.to_lowercase(),
            password_hash: new_account.password_hash,
            role: Role::User,
            status: AccountStatus::Active,
            subscription: Subscription::default(),
            download_count: 0,
            last_login: None,
            created_at: now,
            updated_at: now,
        };
        inner.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AppError> {
        Ok(self.inner.lock().await.accounts.get(&id).cloned())
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Account>, AppError> {
        let inner = self.inner.lock().await;
        let by_username = inner.accounts.values().find(|a| a.username == identifier);
        Ok(by_username
            .or_else(|| inner.accounts.values().find(|a| matches_email(a, identifier)))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        Ok(self
            .inner
            .lock()
            .await
            .accounts
            .values()
            .find(|a| matches_email(a, email))
            .cloned())
    }

    async fn username_or_email_taken(&self, username: &str, email: &str) -> Result<bool, AppError> {
        Ok(self
            .inner
            .lock()
            .await
            .accounts
            .values()
            .any(|a| a.username == username || matches_email(a, email)))
    }

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AppError> {
        if let Some(account) = self.inner.lock().await.accounts.get_mut(&id) {
            account.last_login = Some(at);
            account.updated_at = at;
        }
        Ok(())
    }

    async fn increment_downloads_below(&self, id: Uuid, limit: i32) -> Result<Option<i32>, AppError> {
        let mut inner = self.inner.lock().await;
        match inner.accounts.get_mut(&id) {
            Some(account) if account.download_count < limit => {
                account.download_count += 1;
                Ok(Some(account.download_count))
            }
            _ => Ok(None),
        }
    }

    async fn update_subscription(
        &self,
        id: Uuid,
        subscription: &Subscription,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, AppError> {
        let mut inner = self.inner.lock().await;
        Ok(inner.accounts.get_mut(&id).map(|account| {
            account.subscription = subscription.clone();
            account.updated_at = now;
            account.clone()
        }))
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: AccountStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, AppError> {
        let mut inner = self.inner.lock().await;
        Ok(inner.accounts.get_mut(&id).map(|account| {
            account.status = status;
            account.updated_at = now;
            account.clone()
        }))
    }

    async fn list(&self) -> Result<Vec<Account>, AppError> {
        let mut accounts: Vec<Account> =
            self.inner.lock().await.accounts.values().cloned().collect();
        accounts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(accounts)
    }
}

#[async_trait]
impl ResumeStore for MemoryStore {
    async fn insert(&self, resume: &Resume) -> Result<(), AppError> {
        self.inner.lock().await.resumes.insert(resume.id, resume.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Resume>, AppError> {
        Ok(self.inner.lock().await.resumes.get(&id).cloned())
    }

    async fn save(&self, resume: &Resume) -> Result<(), AppError> {
        let mut inner = self.inner.lock().await;
        if let Some(stored) = inner.resumes.get_mut(&resume.id) {
            *stored = resume.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.inner.lock().await.resumes.remove(&id).is_some())
    }

    async fn list_active(&self, owner_id: Uuid) -> Result<Vec<Resume>, AppError> {
        let mut resumes: Vec<Resume> = self
            .inner
            .lock()
            .await
            .resumes
            .values()
            .filter(|r| r.owner.account_id() == Some(owner_id) && !r.is_deleted())
            .cloned()
            .collect();
        resumes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(resumes)
    }

    async fn list_deleted(&self, owner_id: Uuid) -> Result<Vec<Resume>, AppError> {
        let mut resumes: Vec<Resume> = self
            .inner
            .lock()
            .await
            .resumes
            .values()
            .filter(|r| r.owner.account_id() == Some(owner_id) && r.is_deleted())
            .cloned()
            .collect();
        resumes.sort_by(|a, b| b.deleted_at().cmp(&a.deleted_at()));
        Ok(resumes)
    }

    async fn purge_deleted_before(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        let mut inner = self.inner.lock().await;
        let before = inner.resumes.len();
        inner
            .resumes
            .retain(|_, r| !r.deleted_at().is_some_and(|deleted_at| deleted_at < cutoff));
        Ok((before - inner.resumes.len()) as u64)
    }
}

#[async_trait]
impl DownloadLogStore for MemoryStore {
    async fn append(&self, entry: &DownloadLog) -> Result<(), AppError> {
        if self.fail_download_logs.load(Ordering::SeqCst) {
            return Err(AppError::Internal(anyhow::anyhow!("download log unavailable")));
        }
        self.inner.lock().await.download_logs.push(entry.clone());
        Ok(())
    }
}

#[async_trait]
impl LeadStore for MemoryStore {
    async fn insert(&self, lead: &Lead) -> Result<(), AppError> {
        self.inner.lock().await.leads.push(lead.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Lead>, AppError> {
        let mut leads = self.inner.lock().await.leads.clone();
        leads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(leads)
    }
}
