//! Warn command.
//!
//! Each warn escalates the target's counter; the third one bans.

use tracing::error;

use crate::bot::dispatcher::AppState;
use crate::events::{Sender, TextMessage};
use crate::moderation::{ModerationVerdict, WARN_THRESHOLD, enforce};
use crate::utils::send_text;

pub async fn warn(state: &AppState, msg: &TextMessage, target: &Sender) {
    let verdict = match state.escalation.warn(msg.chat_id, target.id).await {
        Ok(v) => v,
        Err(e) => {
            error!("Failed to warn user {} in chat {}: {:#}", target.id, msg.chat_id, e);
            return;
        }
    };

    let api = state.api.as_ref();
    enforce(api, msg.chat_id, msg.message_id, verdict).await;

    let text = match verdict {
        ModerationVerdict::Ban(_) => format!(
            "کاربر {} به دلیل رسیدن به حد اخطار ({}) بن شد.",
            target.first_name, WARN_THRESHOLD
        ),
        ModerationVerdict::Warn { count, .. } => format!(
            "کاربر {} اخطار گرفت. تعداد اخطارها: {}/{}",
            target.first_name, count, WARN_THRESHOLD
        ),
        _ => return,
    };
    send_text(api, msg.chat_id, &text, None).await;
}
