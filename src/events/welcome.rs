//! Welcome event handler.
//!
//! Greets each new member when the chat has welcomes enabled.

use tracing::info;

use crate::bot::dispatcher::AppState;
use crate::database::{ChatSettings, Feature};
use crate::events::MemberJoin;
use crate::utils::{fill_name, send_text};

/// Default greeting, `{handle}` is the bot's username.
const DEFAULT_WELCOME: &str = "خوش آمدی {name}! قوانین را رعایت کن و @{handle} را منشن کن برای کمک.";

/// Greet the joined members. Returns `false` when welcomes are off.
pub async fn greet(state: &AppState, join: &MemberJoin, settings: &ChatSettings) -> bool {
    if !settings.is_enabled(Feature::Welcome) {
        return false;
    }

    let default_template = DEFAULT_WELCOME.replace("{handle}", &state.bot_username);
    let template = settings.welcome_message.as_deref().unwrap_or(&default_template);

    for member in &join.members {
        let text = fill_name(template, &member.first_name);
        send_text(state.api.as_ref(), join.chat_id, &text, None).await;
        info!("Welcomed {} in chat {}", member.first_name, join.chat_id);
    }

    true
}
