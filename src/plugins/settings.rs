//! Settings plugin.
//!
//! `/تنظیم <key> on|off` toggles a feature flag of the chat.

use tracing::{debug, error};

use crate::bot::dispatcher::AppState;
use crate::database::{ChatSettings, flag_name};
use crate::utils::send_text;

pub async fn toggle(
    state: &AppState,
    chat_id: i64,
    mut settings: ChatSettings,
    short_key: &str,
    enabled: bool,
) {
    let name = flag_name(short_key);

    if settings.set_flag(&name, enabled) {
        if let Err(e) = state.settings.set(chat_id, &settings).await {
            error!("Failed to save settings for chat {}: {:#}", chat_id, e);
            return;
        }
    } else {
        debug!("'{}' is not a flag, chat {} settings left as they were", name, chat_id);
    }

    let status = if enabled { "روشن" } else { "خاموش" };
    let text = format!("تنظیم {} روی {} شد.", short_key, status);
    send_text(state.api.as_ref(), chat_id, &text, None).await;
}
