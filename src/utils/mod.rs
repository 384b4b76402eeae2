//! Utility functions.
//!
//! Helpers shared by plugins and events.

use tracing::{debug, error};

use crate::bot::api::ChatApi;

/// Send a message, logging instead of failing.
pub async fn send_text(api: &dyn ChatApi, chat_id: i64, text: &str, reply_to: Option<i32>) {
    match api.send_message(chat_id, text, reply_to).await {
        Ok(()) => debug!("Sent message to chat {}", chat_id),
        Err(e) => error!("Failed to send message to chat {}: {:#}", chat_id, e),
    }
}

/// Fill a template's `{name}` placeholder.
pub fn fill_name(template: &str, name: &str) -> String {
    template.replace("{name}", name)
}
