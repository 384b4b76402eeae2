//! Cache sizing and expiry.

use std::time::Duration;

/// When an entry leaves the cache on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Fixed lifetime counted from the last write.
    AfterWrite(Duration),
    /// Dropped once nobody has touched it for this long.
    AfterIdle(Duration),
}

/// Capacity and expiry of one named cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub max_capacity: u64,
    pub expiry: Expiry,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 1_000,
            expiry: Expiry::AfterWrite(Duration::from_secs(300)),
        }
    }
}

impl CacheConfig {
    /// Chat settings are read on every message and change only through
    /// admin commands, which write through the cache.
    pub fn settings() -> Self {
        Self {
            max_capacity: 10_000,
            expiry: Expiry::AfterWrite(Duration::from_secs(600)),
        }
    }

    /// Per-user escalation locks. Nothing holds a lock for anywhere near
    /// the idle window.
    pub fn escalation_locks() -> Self {
        Self {
            max_capacity: 5_000,
            expiry: Expiry::AfterIdle(Duration::from_secs(600)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(CacheConfig::settings().expiry, Expiry::AfterWrite(Duration::from_secs(600)));
        assert_eq!(CacheConfig::escalation_locks().expiry, Expiry::AfterIdle(Duration::from_secs(600)));
        assert!(CacheConfig::settings().max_capacity > CacheConfig::escalation_locks().max_capacity);
    }
}
