//! Warning counter repository.
//!
//! One decimal counter per (chat, user). Not cached: counters change on
//! every warn and must be read fresh.

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::database::{KvStore, keys};

/// Repository for warning counters.
#[derive(Clone)]
pub struct WarnsRepository {
    store: Arc<dyn KvStore>,
}

impl WarnsRepository {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Current count, 0 when absent or unreadable.
    pub async fn get(&self, chat_id: i64, user_id: u64) -> Result<u32> {
        let raw = self.store.get(&keys::warnings(chat_id, user_id)).await?;
        Ok(raw.and_then(|r| r.trim().parse().ok()).unwrap_or(0))
    }

    pub async fn set(&self, chat_id: i64, user_id: u64, count: u32) -> Result<()> {
        self.store
            .put(&keys::warnings(chat_id, user_id), &count.to_string())
            .await?;
        debug!("Warnings for user {} in chat {} set to {}", user_id, chat_id, count);
        Ok(())
    }

    /// Reset to zero by deleting the counter.
    pub async fn clear(&self, chat_id: i64, user_id: u64) -> Result<()> {
        self.store.delete(&keys::warnings(chat_id, user_id)).await?;
        debug!("Warnings for user {} in chat {} cleared", user_id, chat_id);
        Ok(())
    }
}
