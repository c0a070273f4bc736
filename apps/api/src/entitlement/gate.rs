use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Account, DownloadLog, Subscription};
use crate::store::{AccountStore, DownloadLogStore};

/// Downloads allowed without an active subscription, over the account's lifetime.
pub const FREE_DOWNLOAD_LIMIT: i32 = 2;

pub const UPGRADE_PROMPT: &str =
    "You have used all your free downloads. Upgrade to a premium plan for unlimited downloads.";

/// Subscribed and either open-ended or not yet expired.
pub fn is_effectively_subscribed(subscription: &Subscription, now: DateTime<Utc>) -> bool {
    subscription.is_subscribed
        && subscription
            .subscription_expiry
            .map_or(true, |expiry| expiry > now)
}

/// Outcome of a permitted download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadGrant {
    pub subscribed: bool,
    pub download_count: i32,
    /// `None` for subscribers.
    pub remaining_free_downloads: Option<i32>,
}

/// Decides whether `account` may download `resume_id` right now.
///
/// Subscribers are always let through. Everyone else consumes one unit of
/// the free quota, taken with a conditional increment so concurrent requests
/// cannot exceed it. Every permitted download is logged; a failing log write
/// is reported in the server log and never blocks the download.
pub async fn check_download(
    accounts: &dyn AccountStore,
    logs: &dyn DownloadLogStore,
    account: &Account,
    resume_id: Uuid,
    now: DateTime<Utc>,
) -> Result<DownloadGrant, AppError> {
    let grant = if is_effectively_subscribed(&account.subscription, now) {
        DownloadGrant {
            subscribed: true,
            download_count: account.download_count,
            remaining_free_downloads: None,
        }
    } else {
        let count = accounts
            .increment_downloads_below(account.id, FREE_DOWNLOAD_LIMIT)
            .await?
            .ok_or_else(|| {
                info!("Download quota exhausted for account {}", account.id);
                AppError::QuotaExceeded(UPGRADE_PROMPT.to_string())
            })?;
        DownloadGrant {
            subscribed: false,
            download_count: count,
            remaining_free_downloads: Some(FREE_DOWNLOAD_LIMIT - count),
        }
    };

    let entry = DownloadLog::new(account.id, resume_id, now);
    if let Err(e) = logs.append(&entry).await {
        warn!(
            "Failed to record download of resume {resume_id} by {}: {e}",
            account.id
        );
    }

    Ok(grant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewAccount, SubscriptionType};
    use crate::store::memory::MemoryStore;
    use chrono::Duration;

    async fn new_account(store: &MemoryStore) -> Account {
        AccountStore::insert(
            store,
            NewAccount {
                username: "alice".into(),
                email: "a@x.com".into(),
                password_hash: "hash".into(),
            },
            Utc::now(),
        )
        .await
        .unwrap()
    }

    fn active_until(expiry: Option<DateTime<Utc>>) -> Subscription {
        Subscription {
            is_subscribed: true,
            subscription_type: Some(SubscriptionType::Monthly),
            subscription_expiry: expiry,
        }
    }

    #[test]
    fn test_effective_subscription() {
        let now = Utc::now();
        assert!(!is_effectively_subscribed(&Subscription::default(), now));
        assert!(is_effectively_subscribed(&active_until(None), now));
        assert!(is_effectively_subscribed(&active_until(Some(now + Duration::days(1))), now));
        assert!(!is_effectively_subscribed(&active_until(Some(now)), now));
        assert!(!is_effectively_subscribed(&active_until(Some(now - Duration::days(1))), now));

        let flag_off = Subscription {
            is_subscribed: false,
            subscription_type: None,
            subscription_expiry: Some(now + Duration::days(30)),
        };
        assert!(!is_effectively_subscribed(&flag_off, now));
    }

    #[tokio::test]
    async fn test_free_account_gets_exactly_two_downloads() {
        let store = MemoryStore::new();
        let account = new_account(&store).await;
        let resume_id = Uuid::new_v4();
        let now = Utc::now();

        let first = check_download(&store, &store, &account, resume_id, now).await.unwrap();
        assert_eq!(first.remaining_free_downloads, Some(1));
        let second = check_download(&store, &store, &account, resume_id, now).await.unwrap();
        assert_eq!(second.remaining_free_downloads, Some(0));

        let third = check_download(&store, &store, &account, resume_id, now).await;
        assert!(matches!(third, Err(AppError::QuotaExceeded(_))));

        let stored = AccountStore::find_by_id(&store, account.id).await.unwrap().unwrap();
        assert_eq!(stored.download_count, 2);
        assert_eq!(store.download_logs().await.len(), 2);
    }

    #[tokio::test]
    async fn test_subscriber_never_denied() {
        let store = MemoryStore::new();
        let mut account = new_account(&store).await;
        let now = Utc::now();
        store.set_download_count(account.id, 50).await;
        account.download_count = 50;
        account.subscription = active_until(Some(now + Duration::days(10)));

        for _ in 0..5 {
            let grant = check_download(&store, &store, &account, Uuid::new_v4(), now)
                .await
                .unwrap();
            assert!(grant.subscribed);
            assert_eq!(grant.remaining_free_downloads, None);
        }
        let stored = AccountStore::find_by_id(&store, account.id).await.unwrap().unwrap();
        assert_eq!(stored.download_count, 50);
        assert_eq!(store.download_logs().await.len(), 5);
    }

    #[tokio::test]
    async fn test_expired_subscription_falls_back_to_quota() {
        let store = MemoryStore::new();
        let mut account = new_account(&store).await;
        let now = Utc::now();
        store.set_download_count(account.id, FREE_DOWNLOAD_LIMIT).await;
        account.subscription = active_until(Some(now - Duration::seconds(1)));

        let result = check_download(&store, &store, &account, Uuid::new_v4(), now).await;
        assert!(matches!(result, Err(AppError::QuotaExceeded(_))));
    }

    #[tokio::test]
    async fn test_log_failure_does_not_block_download() {
        let store = MemoryStore::new();
        let account = new_account(&store).await;
        store.break_download_logs();

        let grant = check_download(&store, &store, &account, Uuid::new_v4(), Utc::now())
            .await
            .unwrap();
        assert_eq!(grant.download_count, 1);
        assert!(store.download_logs().await.is_empty());
    }
}
