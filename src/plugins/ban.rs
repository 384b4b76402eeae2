//! Ban command.

use crate::bot::dispatcher::AppState;
use crate::events::{Sender, TextMessage};
use crate::moderation::{ModerationVerdict, enforce};
use crate::utils::send_text;

/// Ban the author of the replied-to message.
pub async fn ban(state: &AppState, msg: &TextMessage, target: &Sender) {
    let api = state.api.as_ref();
    enforce(api, msg.chat_id, msg.message_id, ModerationVerdict::Ban(target.id)).await;

    let text = format!("کاربر {} بن شد.", target.first_name);
    send_text(api, msg.chat_id, &text, None).await;
}
