use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::purge_cutoff;
use crate::models::{Owner, Resume};
use crate::resumes::ownership::{authorize, Access, Caller};
use crate::store::ResumeStore;

/// Loads a resume and checks the caller may act on it.
pub async fn load_authorized(
    store: &dyn ResumeStore,
    id: Uuid,
    caller: &Caller,
) -> Result<(Resume, Access), AppError> {
    let resume = store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    let access = authorize(&resume, caller)?;
    Ok((resume, access))
}

/// Inserts a new resume. Guests create unclaimed drafts.
pub async fn create(
    store: &dyn ResumeStore,
    caller: &Caller,
    title: Option<String>,
    data: Option<Value>,
    now: DateTime<Utc>,
) -> Result<Resume, AppError> {
    let owner = caller.account_id().map_or(Owner::Unclaimed, Owner::Owned);
    let resume = Resume::new(owner, title, data.unwrap_or_else(|| json!({})), now);
    store.insert(&resume).await?;
    info!("Created resume {} for {:?}", resume.id, owner);
    Ok(resume)
}

pub async fn get(store: &dyn ResumeStore, id: Uuid, caller: &Caller) -> Result<Resume, AppError> {
    Ok(load_authorized(store, id, caller).await?.0)
}

/// Merges the provided fields into an existing resume.
///
/// An account updating an unclaimed draft becomes its owner.
pub async fn update(
    store: &dyn ResumeStore,
    id: Uuid,
    caller: &Caller,
    title: Option<String>,
    data: Option<Value>,
    now: DateTime<Utc>,
) -> Result<Resume, AppError> {
    let (mut resume, access) = load_authorized(store, id, caller).await?;
    if resume.is_deleted() {
        return Err(AppError::Validation(
            "Resume is in the trash; restore it before editing".to_string(),
        ));
    }

    if let Access::Claimable(account_id) = access {
        resume.owner = Owner::Owned(account_id);
        info!("Resume {id} claimed by account {account_id}");
    }
    resume.apply_update(title, data, now);
    store.save(&resume).await?;
    Ok(resume)
}

pub async fn soft_delete(
    store: &dyn ResumeStore,
    id: Uuid,
    caller: &Caller,
    now: DateTime<Utc>,
) -> Result<Resume, AppError> {
    let (mut resume, _) = load_authorized(store, id, caller).await?;
    if !resume.is_deleted() {
        resume.soft_delete(now);
        store.save(&resume).await?;
        info!("Resume {id} moved to trash");
    }
    Ok(resume)
}

/// Takes a resume out of the trash. Restoring a live resume changes nothing.
pub async fn restore(
    store: &dyn ResumeStore,
    id: Uuid,
    caller: &Caller,
    now: DateTime<Utc>,
) -> Result<Resume, AppError> {
    let (mut resume, _) = load_authorized(store, id, caller).await?;
    if resume.restore(now) {
        store.save(&resume).await?;
        info!("Resume {id} restored from trash");
    }
    Ok(resume)
}

pub async fn delete_permanently(
    store: &dyn ResumeStore,
    id: Uuid,
    caller: &Caller,
) -> Result<(), AppError> {
    load_authorized(store, id, caller).await?;
    // Gone already means a concurrent purge or delete won; nothing left to do.
    if store.delete(id).await? {
        info!("Resume {id} permanently deleted");
    }
    Ok(())
}

pub async fn list_for_owner(store: &dyn ResumeStore, owner_id: Uuid) -> Result<Vec<Resume>, AppError> {
    store.list_active(owner_id).await
}

pub async fn list_trash(store: &dyn ResumeStore, owner_id: Uuid) -> Result<Vec<Resume>, AppError> {
    store.list_deleted(owner_id).await
}

/// Permanently removes resumes that have sat in the trash past retention.
pub async fn purge_expired(store: &dyn ResumeStore, now: DateTime<Utc>) -> Result<u64, AppError> {
    store.purge_deleted_before(purge_cutoff(now)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::store::memory::MemoryStore;
    use chrono::Duration;

    fn account(id: Uuid) -> Caller {
        Caller::Account { id, role: Role::User }
    }

    #[tokio::test]
    async fn test_create_update_fetch_round_trip() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let caller = account(owner);
        let now = Utc::now();

        let created = create(&store, &caller, None, Some(json!({"v": 1})), now).await.unwrap();
        assert_eq!(created.title, "Untitled Resume");
        assert_eq!(created.owner, Owner::Owned(owner));

        update(&store, created.id, &caller, Some("Draft".into()), Some(json!({"v": 2})), now)
            .await
            .unwrap();
        update(&store, created.id, &caller, Some("Final".into()), Some(json!({"v": 3})), now)
            .await
            .unwrap();

        let fetched = get(&store, created.id, &caller).await.unwrap();
        assert_eq!(fetched.title, "Final");
        assert_eq!(fetched.data, json!({"v": 3}));
        assert_eq!(store.resume_count().await, 1);
    }

    #[tokio::test]
    async fn test_update_unknown_resume_not_found() {
        let store = MemoryStore::new();
        let err = update(&store, Uuid::new_v4(), &account(Uuid::new_v4()), None, None, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_by_stranger_unauthorized() {
        let store = MemoryStore::new();
        let owner = account(Uuid::new_v4());
        let created = create(&store, &owner, None, None, Utc::now()).await.unwrap();

        let err = update(&store, created.id, &account(Uuid::new_v4()), Some("Mine".into()), None, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
        assert_eq!(get(&store, created.id, &owner).await.unwrap().title, "Untitled Resume");
    }

    #[tokio::test]
    async fn test_guest_draft_claimed_on_first_authenticated_update() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let draft = create(&store, &Caller::Guest, Some("Guest CV".into()), None, now)
            .await
            .unwrap();
        assert_eq!(draft.owner, Owner::Unclaimed);

        // Guests may keep editing their own draft without claiming it.
        let edited = update(&store, draft.id, &Caller::Guest, None, Some(json!({"a": 1})), now)
            .await
            .unwrap();
        assert_eq!(edited.owner, Owner::Unclaimed);

        let claimer = Uuid::new_v4();
        let claimed = update(&store, draft.id, &account(claimer), None, None, now)
            .await
            .unwrap();
        assert_eq!(claimed.owner, Owner::Owned(claimer));

        // Once claimed, nobody else can write to it.
        let err = update(&store, draft.id, &Caller::Guest, None, None, now).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
        let listed = list_for_owner(&store, claimer).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_admin_can_edit_without_claiming() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let created = create(&store, &account(owner), None, None, Utc::now()).await.unwrap();
        let admin = Caller::Account {
            id: Uuid::new_v4(),
            role: Role::Admin,
        };
        let updated = update(&store, created.id, &admin, Some("Fixed".into()), None, Utc::now())
            .await
            .unwrap();
        assert_eq!(updated.owner, Owner::Owned(owner));
        assert_eq!(updated.title, "Fixed");
    }

    #[tokio::test]
    async fn test_soft_delete_hides_from_listing_and_restore_returns_it() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let caller = account(owner);
        let now = Utc::now();
        let created = create(&store, &caller, None, None, now).await.unwrap();

        let deleted = soft_delete(&store, created.id, &caller, now).await.unwrap();
        assert!(deleted.is_deleted());
        assert_eq!(deleted.deleted_at(), Some(now));
        assert!(list_for_owner(&store, owner).await.unwrap().is_empty());
        assert_eq!(list_trash(&store, owner).await.unwrap().len(), 1);

        let err = update(&store, created.id, &caller, Some("x".into()), None, now).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let restored = restore(&store, created.id, &caller, now).await.unwrap();
        assert!(!restored.is_deleted());
        assert!(restored.deleted_at().is_none());
        assert_eq!(list_for_owner(&store, owner).await.unwrap().len(), 1);
        assert!(list_trash(&store, owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_restore_live_resume_is_noop() {
        let store = MemoryStore::new();
        let caller = account(Uuid::new_v4());
        let created = create(&store, &caller, None, None, Utc::now()).await.unwrap();
        let later = Utc::now() + Duration::hours(2);

        let restored = restore(&store, created.id, &caller, later).await.unwrap();
        assert_eq!(restored, created);
        assert_eq!(get(&store, created.id, &caller).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_restore_just_before_purge_deadline() {
        let store = MemoryStore::new();
        let caller = account(Uuid::new_v4());
        let now = Utc::now();
        let created = create(&store, &caller, None, None, now).await.unwrap();
        soft_delete(&store, created.id, &caller, now - Duration::days(30) + Duration::seconds(1))
            .await
            .unwrap();

        assert_eq!(purge_expired(&store, now).await.unwrap(), 0);
        let restored = restore(&store, created.id, &caller, now).await.unwrap();
        assert!(!restored.is_deleted());
    }

    #[tokio::test]
    async fn test_purge_removes_only_expired_tombstones() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let caller = account(owner);
        let now = Utc::now();

        let live = create(&store, &caller, Some("live".into()), None, now).await.unwrap();
        let recent = create(&store, &caller, Some("recent".into()), None, now).await.unwrap();
        let old = create(&store, &caller, Some("old".into()), None, now).await.unwrap();
        soft_delete(&store, recent.id, &caller, now - Duration::days(29)).await.unwrap();
        soft_delete(&store, old.id, &caller, now - Duration::days(31)).await.unwrap();

        assert_eq!(purge_expired(&store, now).await.unwrap(), 1);
        assert!(store.get(old.id).await.unwrap().is_none());
        assert!(store.get(recent.id).await.unwrap().is_some());
        assert!(store.get(live.id).await.unwrap().is_some());

        // Idempotent: a second sweep has nothing left to remove.
        assert_eq!(purge_expired(&store, now).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_listing_orders_by_last_update() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let caller = account(owner);
        let t0 = Utc::now();
        let a = create(&store, &caller, Some("a".into()), None, t0).await.unwrap();
        create(&store, &caller, Some("b".into()), None, t0 + Duration::minutes(1))
            .await
            .unwrap();
        update(&store, a.id, &caller, None, Some(json!({})), t0 + Duration::minutes(2))
            .await
            .unwrap();

        let titles: Vec<String> = list_for_owner(&store, owner)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_permanently() {
        let store = MemoryStore::new();
        let caller = account(Uuid::new_v4());
        let created = create(&store, &caller, None, None, Utc::now()).await.unwrap();

        let err = delete_permanently(&store, created.id, &account(Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));

        delete_permanently(&store, created.id, &caller).await.unwrap();
        assert_eq!(store.resume_count().await, 0);
        assert!(matches!(
            delete_permanently(&store, created.id, &caller).await,
            Err(AppError::NotFound(_))
        ));
    }
}
