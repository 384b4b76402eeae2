//! Message dispatcher setup.
//!
//! Builds the teloxide dispatcher and the shared state every handler uses.

use std::sync::Arc;

use anyhow::Context;
use teloxide::adaptors::Throttle;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::User;
use tracing::debug;

use super::api::ChatApi;
use crate::assistant::Assistant;
use crate::cache::CacheRegistry;
use crate::config::Config;
use crate::database::{KvStore, SettingsRepository, WarnsRepository};
use crate::events::{self, AssistRouter, InboundEvent, MemberJoin, Sender, TextMessage};
use crate::moderation::{EscalationStateMachine, ModerationPipeline};
use crate::permissions::AdminResolver;
use crate::plugins::CommandRouter;

/// Bot type with Throttle adaptor for automatic rate limiting.
pub type ThrottledBot = Throttle<Bot>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Per-chat settings.
    pub settings: SettingsRepository,

    /// Warning counters and the ban threshold.
    pub escalation: EscalationStateMachine,

    /// Chat-local ∪ process-wide admins.
    pub admins: AdminResolver,

    pub pipeline: ModerationPipeline,
    pub commands: Arc<CommandRouter>,
    pub assist: Arc<AssistRouter>,

    /// Outbound Telegram calls.
    pub api: Arc<dyn ChatApi>,

    /// Completion backend.
    pub assistant: Arc<dyn Assistant>,

    /// Bot username (without @).
    pub bot_username: String,
}

impl AppState {
    /// Wire the engine over its collaborators.
    pub fn new(
        config: &Config,
        store: Arc<dyn KvStore>,
        api: Arc<dyn ChatApi>,
        assistant: Arc<dyn Assistant>,
        bot_username: String,
    ) -> anyhow::Result<Self> {
        let cache = CacheRegistry::new();
        let admins = AdminResolver::new(config.admin_ids.clone());

        let settings = SettingsRepository::new(store.clone(), &cache, admins.global());
        let escalation = EscalationStateMachine::new(WarnsRepository::new(store), &cache);

        let commands = CommandRouter::new(&config.commands).context("Invalid command tokens")?;
        let assist = AssistRouter::new(&bot_username, &config.commands.ask)
            .context("Invalid assistant command token")?;

        Ok(Self {
            settings,
            escalation,
            pipeline: ModerationPipeline::new(admins.clone()),
            admins,
            commands: Arc::new(commands),
            assist: Arc::new(assist),
            api,
            assistant,
            bot_username,
        })
    }
}

/// Build the dispatcher with all handlers.
pub fn build_dispatcher(
    bot: ThrottledBot,
    state: AppState,
) -> Dispatcher<ThrottledBot, anyhow::Error, teloxide::dispatching::DefaultKey> {
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
}

/// Build the handler schema.
fn schema() -> UpdateHandler<anyhow::Error> {
    Update::filter_message().endpoint(message_handler)
}

/// Feed one message through the engine. Always succeeds.
async fn message_handler(msg: Message, state: AppState) -> anyhow::Result<()> {
    let outcome = events::handle_event(&state, to_event(&msg)).await;
    debug!("Message {} in chat {}: {:?}", msg.id.0, msg.chat.id, outcome);
    Ok(())
}

fn sender(user: Option<&User>) -> Sender {
    user.map(|u| Sender::new(u.id.0, u.first_name.clone()))
        .unwrap_or_default()
}

/// Convert a Telegram message. Missing fields become empty values.
pub fn to_event(msg: &Message) -> InboundEvent {
    let from = sender(msg.from.as_ref());

    if let Some(members) = msg.new_chat_members() {
        return InboundEvent::NewChatMembers(MemberJoin {
            chat_id: msg.chat.id.0,
            message_id: msg.id.0,
            from,
            members: members.iter().map(|u| sender(Some(u))).collect(),
        });
    }

    InboundEvent::Text(TextMessage {
        chat_id: msg.chat.id.0,
        message_id: msg.id.0,
        from,
        text: msg.text().unwrap_or_default().to_string(),
        reply_to: msg
            .reply_to_message()
            .and_then(|r| r.from.as_ref())
            .map(|u| sender(Some(u))),
    })
}
