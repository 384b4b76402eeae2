//! Warning escalation.
//!
//! Every warn bumps the user's counter; reaching [`WARN_THRESHOLD`] turns
//! into a ban and starts the user over from zero. Unmuting also wipes the
//! counter.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use super::ModerationVerdict;
use crate::cache::{CacheConfig, CacheRegistry, TypedCache};
use crate::database::WarnsRepository;

/// Warnings that trigger a ban.
pub const WARN_THRESHOLD: u32 = 3;

/// Per-user warning state machine.
///
/// Read-increment-write on one counter is serialized inside this process.
/// Several processes sharing a store can still race.
#[derive(Clone)]
pub struct EscalationStateMachine {
    warns: WarnsRepository,
    locks: TypedCache<(i64, u64), Arc<Mutex<()>>>,
}

impl EscalationStateMachine {
    pub fn new(warns: WarnsRepository, cache: &CacheRegistry) -> Self {
        Self {
            warns,
            locks: cache.get_or_create("escalation_locks", CacheConfig::escalation_locks()),
        }
    }

    fn lock_for(&self, chat_id: i64, user_id: u64) -> Arc<Mutex<()>> {
        self.locks
            .get_or_insert_with((chat_id, user_id), || Arc::new(Mutex::new(())))
    }

    /// Record one warning. Yields `Warn` with the new count, or `Ban` once
    /// the threshold is reached (the counter is then cleared).
    pub async fn warn(&self, chat_id: i64, user_id: u64) -> Result<ModerationVerdict> {
        let lock = self.lock_for(chat_id, user_id);
        let _guard = lock.lock().await;

        let count = self.warns.get(chat_id, user_id).await? + 1;

        if count >= WARN_THRESHOLD {
            info!("User {} reached {} warnings in chat {}", user_id, count, chat_id);
            // The ban stands even if the counter survives.
            if let Err(e) = self.warns.clear(chat_id, user_id).await {
                error!("Failed to clear warnings of user {} in chat {}: {:#}", user_id, chat_id, e);
            }
            return Ok(ModerationVerdict::Ban(user_id));
        }

        self.warns.set(chat_id, user_id, count).await?;
        debug!("User {} now has {}/{} warnings in chat {}", user_id, count, WARN_THRESHOLD, chat_id);
        Ok(ModerationVerdict::Warn { user_id, count })
    }

    /// Lift a mute; the counter is cleared whatever its value.
    pub async fn unmute(&self, chat_id: i64, user_id: u64) -> Result<ModerationVerdict> {
        let lock = self.lock_for(chat_id, user_id);
        let _guard = lock.lock().await;

        self.warns.clear(chat_id, user_id).await?;
        Ok(ModerationVerdict::Unmute(user_id))
    }

    /// Current warning count.
    #[cfg(test)]
    pub async fn count(&self, chat_id: i64, user_id: u64) -> Result<u32> {
        self.warns.get(chat_id, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::database::MemoryStore;
    use crate::testing::TestStore;

    fn machine() -> EscalationStateMachine {
        let warns = WarnsRepository::new(Arc::new(MemoryStore::new()));
        EscalationStateMachine::new(warns, &CacheRegistry::new())
    }

    #[tokio::test]
    async fn test_three_warnings_ban() {
        let m = machine();

        assert_eq!(m.warn(-1, 7).await.unwrap(), ModerationVerdict::Warn { user_id: 7, count: 1 });
        assert_eq!(m.warn(-1, 7).await.unwrap(), ModerationVerdict::Warn { user_id: 7, count: 2 });
        assert_eq!(m.warn(-1, 7).await.unwrap(), ModerationVerdict::Ban(7));
        assert_eq!(m.count(-1, 7).await.unwrap(), 0);

        // A new cycle starts from scratch.
        assert_eq!(m.warn(-1, 7).await.unwrap(), ModerationVerdict::Warn { user_id: 7, count: 1 });
    }

    #[tokio::test]
    async fn test_counters_are_per_chat_and_user() {
        let m = machine();
        m.warn(-1, 7).await.unwrap();
        m.warn(-1, 7).await.unwrap();

        assert_eq!(m.warn(-2, 7).await.unwrap(), ModerationVerdict::Warn { user_id: 7, count: 1 });
        assert_eq!(m.warn(-1, 8).await.unwrap(), ModerationVerdict::Warn { user_id: 8, count: 1 });
    }

    #[tokio::test]
    async fn test_unmute_clears() {
        let m = machine();

        assert_eq!(m.unmute(-1, 7).await.unwrap(), ModerationVerdict::Unmute(7));
        assert_eq!(m.count(-1, 7).await.unwrap(), 0);

        m.warn(-1, 7).await.unwrap();
        m.warn(-1, 7).await.unwrap();
        assert_eq!(m.unmute(-1, 7).await.unwrap(), ModerationVerdict::Unmute(7));
        assert_eq!(m.count(-1, 7).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_ban_survives_failed_clear() {
        let warns = WarnsRepository::new(Arc::new(TestStore::failing_deletes()));
        let m = EscalationStateMachine::new(warns, &CacheRegistry::new());

        m.warn(-1, 7).await.unwrap();
        m.warn(-1, 7).await.unwrap();
        assert_eq!(m.warn(-1, 7).await.unwrap(), ModerationVerdict::Ban(7));

        // The stale counter keeps the user at the threshold.
        assert_eq!(m.count(-1, 7).await.unwrap(), 2);
        assert_eq!(m.warn(-1, 7).await.unwrap(), ModerationVerdict::Ban(7));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_warns_are_not_lost() {
        let warns = WarnsRepository::new(Arc::new(TestStore::slow_reads(Duration::from_millis(20))));
        let m = EscalationStateMachine::new(warns, &CacheRegistry::new());

        let tasks: Vec<_> = (0..2)
            .map(|_| {
                let m = m.clone();
                tokio::spawn(async move { m.warn(-1, 7).await })
            })
            .collect();

        let mut counts = Vec::new();
        for task in tasks {
            match task.await.unwrap().unwrap() {
                ModerationVerdict::Warn { count, .. } => counts.push(count),
                other => panic!("unexpected verdict {:?}", other),
            }
        }
        counts.sort();
        assert_eq!(counts, vec![1, 2]);
        assert_eq!(m.count(-1, 7).await.unwrap(), 2);
    }
}
