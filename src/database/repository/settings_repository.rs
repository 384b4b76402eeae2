//! Chat settings repository with read-through caching.
//!
//! Settings are consulted for every message, so reads are cached (10min TTL)
//! and writes go through the cache.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, warn};

use crate::cache::{CacheConfig, CacheRegistry, TypedCache};
use crate::database::models::ChatSettings;
use crate::database::{KvStore, keys};

/// Repository for per-chat settings.
#[derive(Clone)]
pub struct SettingsRepository {
    store: Arc<dyn KvStore>,
    cache: TypedCache<i64, ChatSettings>,
    /// Seeded into `admins` of every new chat.
    global_admins: Arc<[u64]>,
}

impl SettingsRepository {
    pub fn new(store: Arc<dyn KvStore>, cache: &CacheRegistry, global_admins: &[u64]) -> Self {
        Self {
            store,
            cache: cache.get_or_create("chat_settings", CacheConfig::settings()),
            global_admins: global_admins.into(),
        }
    }

    /// Settings of a chat. Never fails.
    ///
    /// - unknown chat: defaults are persisted and returned
    /// - unreadable document: the empty configuration, store left untouched
    /// - store error: defaults, not persisted
    pub async fn get(&self, chat_id: i64) -> ChatSettings {
        if let Some(settings) = self.cache.get(&chat_id) {
            return settings;
        }

        let raw = match self.store.get(&keys::settings(chat_id)).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to load settings for chat {}: {:#}", chat_id, e);
                return ChatSettings::defaults(&self.global_admins);
            }
        };

        match raw {
            Some(raw) => match ChatSettings::parse(&raw) {
                Some(settings) => {
                    self.cache.insert(chat_id, settings.clone());
                    settings
                }
                None => {
                    warn!("Stored settings for chat {} are unreadable, using empty settings", chat_id);
                    ChatSettings::default()
                }
            },
            None => {
                let settings = ChatSettings::defaults(&self.global_admins);
                debug!("Creating default settings for chat {}", chat_id);
                if let Err(e) = self.set(chat_id, &settings).await {
                    warn!("Failed to persist default settings for chat {}: {:#}", chat_id, e);
                }
                settings
            }
        }
    }

    /// Replace the settings of a chat.
    pub async fn set(&self, chat_id: i64, settings: &ChatSettings) -> Result<()> {
        self.store
            .put(&keys::settings(chat_id), &settings.to_json()?)
            .await?;
        self.cache.insert(chat_id, settings.clone());
        debug!("Saved settings for chat {}", chat_id);
        Ok(())
    }

    /// Drop the cached copy so the next read hits the store.
    #[cfg(test)]
    pub fn invalidate(&self, chat_id: i64) {
        self.cache.invalidate(&chat_id);
    }
}
