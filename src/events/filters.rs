//! Moderation stage of the dispatcher.

use tracing::debug;

use crate::bot::dispatcher::AppState;
use crate::database::ChatSettings;
use crate::events::TextMessage;
use crate::moderation::{ModerationVerdict, enforce};

/// Run the pipeline over a message and enforce the outcome.
/// Returns the verdict so the caller can stop routing.
pub async fn moderate(state: &AppState, msg: &TextMessage, settings: &ChatSettings) -> ModerationVerdict {
    let verdict = state.pipeline.evaluate(&msg.text, msg.from.id, settings);

    if verdict != ModerationVerdict::NoAction {
        debug!("Message {} in chat {} judged {:?}", msg.message_id, msg.chat_id, verdict);
        enforce(state.api.as_ref(), msg.chat_id, msg.message_id, verdict).await;
    }

    verdict
}
