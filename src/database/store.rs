//! Key-value storage contract.
//!
//! Everything the bot persists is a string value under a string key. The
//! key schema is shared with earlier deployments and must stay stable.

use async_trait::async_trait;

/// Minimal key-value store.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read a value, `None` when absent.
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Write a value, replacing any previous one.
    async fn put(&self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Remove a value. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> anyhow::Result<()>;
}

/// Storage keys.
pub mod keys {
    /// Chat settings document.
    pub fn settings(chat_id: i64) -> String {
        format!("settings:{}", chat_id)
    }

    /// Warning counter of one user in one chat.
    pub fn warnings(chat_id: i64, user_id: u64) -> String {
        format!("warn:{}:{}", chat_id, user_id)
    }
}
