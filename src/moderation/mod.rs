//! Moderation decisions and their enforcement.
//!
//! - `pipeline` - decides whether a member's message must go
//! - `escalation` - warning counters and the ban threshold
//!
//! Both produce a [`ModerationVerdict`]; [`enforce`] turns a verdict into
//! Telegram calls.

pub mod escalation;
pub mod pipeline;

use chrono::{Duration, Utc};
use tracing::{error, info};

use crate::bot::api::{ChatApi, Restriction};

pub use escalation::{EscalationStateMachine, WARN_THRESHOLD};
pub use pipeline::ModerationPipeline;

/// The single action taken for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationVerdict {
    NoAction,
    DeleteMessage,
    Ban(u64),
    Mute { user_id: u64, seconds: u64 },
    Unmute(u64),
    /// Warning recorded, `count` is the new total.
    Warn { user_id: u64, count: u32 },
}

/// Apply a verdict. Failures are logged and swallowed.
pub async fn enforce(api: &dyn ChatApi, chat_id: i64, message_id: i32, verdict: ModerationVerdict) {
    let result = match verdict {
        ModerationVerdict::NoAction | ModerationVerdict::Warn { .. } => return,
        ModerationVerdict::DeleteMessage => api.delete_message(chat_id, message_id).await,
        ModerationVerdict::Ban(user_id) => api.ban_chat_member(chat_id, user_id).await,
        ModerationVerdict::Mute { user_id, seconds } => {
            let restriction = Restriction::Muted {
                until: mute_deadline(seconds),
            };
            api.restrict_chat_member(chat_id, user_id, restriction).await
        }
        ModerationVerdict::Unmute(user_id) => {
            api.restrict_chat_member(chat_id, user_id, Restriction::Unrestricted)
                .await
        }
    };

    match result {
        Ok(()) => info!("Enforced {:?} in chat {}", verdict, chat_id),
        Err(e) => error!("Failed to enforce {:?} in chat {}: {:#}", verdict, chat_id, e),
    }
}

/// `now + seconds`; absurd durations mean "until lifted".
fn mute_deadline(seconds: u64) -> Option<chrono::DateTime<Utc>> {
    i64::try_from(seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|d| Utc::now().checked_add_signed(d))
}
