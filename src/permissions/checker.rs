//! Admin checks.

use std::sync::Arc;

use tracing::debug;

use crate::database::ChatSettings;

/// Resolves chat-local ∪ process-wide admins.
#[derive(Clone, Debug, Default)]
pub struct AdminResolver {
    /// Process-wide admins - admins in every chat.
    global: Arc<[u64]>,
}

impl AdminResolver {
    pub fn new(global: Vec<u64>) -> Self {
        Self {
            global: global.into(),
        }
    }

    /// Check if a user is a process-wide admin.
    #[inline]
    pub fn is_global_admin(&self, user_id: u64) -> bool {
        self.global.contains(&user_id)
    }

    /// Check if a user is an admin of the chat `settings` belong to.
    pub fn is_admin(&self, user_id: u64, settings: &ChatSettings) -> bool {
        let admin = self.is_global_admin(user_id) || settings.admins.contains(&user_id);
        if admin {
            debug!("User {} resolved as admin", user_id);
        }
        admin
    }

    pub fn global(&self) -> &[u64] {
        &self.global
    }
}
