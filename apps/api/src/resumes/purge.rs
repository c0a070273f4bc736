//! Background sweep that hard-deletes resumes past trash retention.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::resumes::service::purge_expired;
use crate::store::ResumeStore;

/// Spawns the purge loop. The first sweep runs immediately, then every `every`.
///
/// Sweeps are idempotent, so a failed sweep is logged and simply retried on
/// the next tick.
pub fn spawn_purge_task(store: Arc<dyn ResumeStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match purge_expired(store.as_ref(), Utc::now()).await {
                Ok(0) => {}
                Ok(purged) => info!("Purged {purged} resumes past trash retention"),
                Err(e) => error!("Trash purge sweep failed: {e}"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Owner, Resume};
    use crate::store::memory::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_sweep_runs_on_start() {
        let store = MemoryStore::new();
        let mut expired = Resume::new(Owner::Unclaimed, None, json!({}), Utc::now());
        expired.soft_delete(Utc::now() - chrono::Duration::days(45));
        store.put_resume(expired).await;

        let handle = spawn_purge_task(Arc::new(store.clone()), Duration::from_secs(3600));
        for _ in 0..50 {
            if store.resume_count().await == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        handle.abort();
        assert_eq!(store.resume_count().await, 0);
    }
}
