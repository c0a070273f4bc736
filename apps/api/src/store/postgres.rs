use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    Account, AccountStatus, DownloadLog, Lead, NewAccount, Owner, Resume, Role, Subscription,
    SubscriptionType,
};
use crate::store::{AccountStore, DownloadLogStore, LeadStore, ResumeStore};

/// Postgres-backed implementation of every store trait.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ACCOUNT_COLUMNS: &str = "id, username, email, password_hash, role, status, is_subscribed, \
     subscription_type, subscription_expiry, download_count, last_login, created_at, updated_at";

const RESUME_COLUMNS: &str = "id, owner_id, title, data, deleted_at, created_at, updated_at";

#[derive(Debug, FromRow)]
struct AccountRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    status: String,
    is_subscribed: bool,
    subscription_type: Option<String>,
    subscription_expiry: Option<DateTime<Utc>>,
    download_count: i32,
    last_login: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = AppError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let subscription_type = row
            .subscription_type
            .as_deref()
            .map(str::parse::<SubscriptionType>)
            .transpose()
            .context("corrupt subscription_type column")?;
        Ok(Account {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            role: row.role.parse::<Role>().context("corrupt role column")?,
            status: row.status.parse::<AccountStatus>().context("corrupt status column")?,
            subscription: Subscription {
                is_subscribed: row.is_subscribed,
                subscription_type,
                subscription_expiry: row.subscription_expiry,
            },
            download_count: row.download_count,
            last_login: row.last_login,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct ResumeRow {
    id: Uuid,
    owner_id: Option<Uuid>,
    title: String,
    data: Value,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ResumeRow> for Resume {
    fn from(row: ResumeRow) -> Self {
        Resume::from_parts(
            row.id,
            Owner::from_column(row.owner_id),
            row.title,
            row.data,
            row.deleted_at,
            row.created_at,
            row.updated_at,
        )
    }
}

fn map_unique_violation(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("Username or email already exists".to_string())
        }
        _ => AppError::Database(e),
    }
}

fn into_accounts(rows: Vec<AccountRow>) -> Result<Vec<Account>, AppError> {
    rows.into_iter().map(Account::try_from).collect()
}

#[async_trait]
impl AccountStore for PgStore {
    async fn insert(&self, new_account: NewAccount, now: DateTime<Utc>) -> Result<Account, AppError> {
        let row: AccountRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO accounts (id, username, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new_account.username)
        .bind(&new_account.email)
        .bind(&new_account.password_hash)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        info!("Created account {} ({})", row.id, row.username);
        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AppError> {
        let row: Option<AccountRow> =
            sqlx::query_as(&format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(Account::try_from).transpose()
    }

    /// An exact username match wins over an email match on another account.
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Account>, AppError> {
        let row: Option<AccountRow> = sqlx::query_as(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts \
             WHERE username = $1 OR email = lower($1) \
             ORDER BY (username = $1) DESC \
             LIMIT 1"
        ))
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Account::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        let row: Option<AccountRow> = sqlx::query_as(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Account::try_from).transpose()
    }

    async fn username_or_email_taken(&self, username: &str, email: &str) -> Result<bool, AppError> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM accounts WHERE username = $1 OR email = lower($2))",
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query("UPDATE accounts SET last_login = $2, updated_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn increment_downloads_below(&self, id: Uuid, limit: i32) -> Result<Option<i32>, AppError> {
        // Conditional increment: concurrent downloads cannot push the counter past the limit.
        let count: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE accounts
            SET download_count = download_count + 1, updated_at = now()
            WHERE id = $1 AND download_count < $2
            RETURNING download_count
            "#,
        )
        .bind(id)
        .bind(limit)
        .fetch_optional(&self.pool)
        .await?;
        Ok(count)
    }

    async fn update_subscription(
        &self,
        id: Uuid,
        subscription: &Subscription,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, AppError> {
        let row: Option<AccountRow> = sqlx::query_as(&format!(
            r#"
            UPDATE accounts
            SET is_subscribed = $2, subscription_type = $3, subscription_expiry = $4, updated_at = $5
            WHERE id = $1
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(subscription.is_subscribed)
        .bind(subscription.subscription_type.map(|t| t.as_str()))
        .bind(subscription.subscription_expiry)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Account::try_from).transpose()
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: AccountStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, AppError> {
        let row: Option<AccountRow> = sqlx::query_as(&format!(
            "UPDATE accounts SET status = $2, updated_at = $3 WHERE id = $1 RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Account::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<Account>, AppError> {
        let rows: Vec<AccountRow> = sqlx::query_as(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        into_accounts(rows)
    }
}

#[async_trait]
impl ResumeStore for PgStore {
    async fn insert(&self, resume: &Resume) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO resumes (id, owner_id, title, data, is_deleted, deleted_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(resume.id)
        .bind(resume.owner.account_id())
        .bind(&resume.title)
        .bind(&resume.data)
        .bind(resume.is_deleted())
        .bind(resume.deleted_at())
        .bind(resume.created_at)
        .bind(resume.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Resume>, AppError> {
        let row: Option<ResumeRow> =
            sqlx::query_as(&format!("SELECT {RESUME_COLUMNS} FROM resumes WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Resume::from))
    }

    async fn save(&self, resume: &Resume) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE resumes
            SET owner_id = $2, title = $3, data = $4, is_deleted = $5, deleted_at = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(resume.id)
        .bind(resume.owner.account_id())
        .bind(&resume.title)
        .bind(&resume.data)
        .bind(resume.is_deleted())
        .bind(resume.deleted_at())
        .bind(resume.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_active(&self, owner_id: Uuid) -> Result<Vec<Resume>, AppError> {
        let rows: Vec<ResumeRow> = sqlx::query_as(&format!(
            "SELECT {RESUME_COLUMNS} FROM resumes WHERE owner_id = $1 AND NOT is_deleted ORDER BY updated_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Resume::from).collect())
    }

    async fn list_deleted(&self, owner_id: Uuid) -> Result<Vec<Resume>, AppError> {
        let rows: Vec<ResumeRow> = sqlx::query_as(&format!(
            "SELECT {RESUME_COLUMNS} FROM resumes WHERE owner_id = $1 AND is_deleted ORDER BY deleted_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Resume::from).collect())
    }

    async fn purge_deleted_before(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM resumes WHERE is_deleted AND deleted_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl DownloadLogStore for PgStore {
    async fn append(&self, entry: &DownloadLog) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO download_logs (id, account_id, resume_id, downloaded_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(entry.id)
        .bind(entry.account_id)
        .bind(entry.resume_id)
        .bind(entry.downloaded_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl LeadStore for PgStore {
    async fn insert(&self, lead: &Lead) -> Result<(), AppError> {
        sqlx::query("INSERT INTO leads (id, name, email, mobile, created_at) VALUES ($1, $2, $3, $4, $5)")
            .bind(lead.id)
            .bind(&lead.name)
            .bind(&lead.email)
            .bind(&lead.mobile)
            .bind(lead.created_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Lead>, AppError> {
        Ok(
            sqlx::query_as::<_, Lead>("SELECT * FROM leads ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?,
        )
    }
}
