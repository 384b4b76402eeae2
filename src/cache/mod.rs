//! In-process caches backed by Moka.
//!
//! Repositories get their cache from a shared [`CacheRegistry`] by name:
//! `chat_settings` fronts the settings store and `escalation_locks` holds
//! the per-user warning locks.

mod config;
mod registry;
mod typed;

pub use config::CacheConfig;
pub use registry::CacheRegistry;
pub use typed::TypedCache;
