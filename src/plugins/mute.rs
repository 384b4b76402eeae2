//! Mute management commands.
//!
//! Commands for muting and unmuting users.

use tracing::error;

use crate::bot::dispatcher::AppState;
use crate::events::{Sender, TextMessage};
use crate::moderation::{ModerationVerdict, enforce};
use crate::utils::send_text;

/// Mute the target for `seconds`.
pub async fn mute(state: &AppState, msg: &TextMessage, target: &Sender, seconds: u64) {
    let api = state.api.as_ref();
    let verdict = ModerationVerdict::Mute { user_id: target.id, seconds };
    enforce(api, msg.chat_id, msg.message_id, verdict).await;

    let text = format!("کاربر {} به مدت {} ثانیه سکوت شد.", target.first_name, seconds);
    send_text(api, msg.chat_id, &text, None).await;
}

/// Lift every restriction and wipe the target's warnings.
pub async fn unmute(state: &AppState, msg: &TextMessage, target: &Sender) {
    let cleared = match state.escalation.unmute(msg.chat_id, target.id).await {
        Ok(_) => true,
        Err(e) => {
            error!("Failed to clear warnings of user {} in chat {}: {:#}", target.id, msg.chat_id, e);
            false
        }
    };

    // The restriction is lifted either way.
    let api = state.api.as_ref();
    enforce(api, msg.chat_id, msg.message_id, ModerationVerdict::Unmute(target.id)).await;

    let text = if cleared {
        format!("کاربر {} از سکوت خارج شد و اخطارها پاک شد.", target.first_name)
    } else {
        format!("کاربر {} از سکوت خارج شد.", target.first_name)
    };
    send_text(api, msg.chat_id, &text, None).await;
}
