//! Event handling.
//!
//! Every inbound event goes through the same stages, in order:
//! 1. admin commands (`plugins`)
//! 2. welcome (`welcome`)
//! 3. moderation (`filters`)
//! 4. assistant (`assist`)
//!
//! The first stage that acts ends the event.

pub mod assist;
pub mod filters;
mod inbound;
pub mod welcome;

use tracing::debug;

use crate::bot::dispatcher::AppState;
use crate::moderation::ModerationVerdict;
use crate::plugins;
use crate::utils::send_text;

pub use assist::AssistRouter;
pub use inbound::{InboundEvent, MemberJoin, Sender, TextMessage};

/// What ended the handling of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Command,
    Welcomed,
    Moderated(ModerationVerdict),
    Assisted,
    Ignored,
}

/// Handle one event to completion. Never fails; problems are logged by
/// the stage that hit them.
pub async fn handle_event(state: &AppState, event: InboundEvent) -> Outcome {
    let chat_id = event.chat_id();
    let settings = state.settings.get(chat_id).await;

    debug!(
        "Handling event in chat {} from {}: '{}'",
        chat_id,
        event.sender().id,
        event.text().chars().take(30).collect::<String>()
    );

    match event {
        InboundEvent::NewChatMembers(join) => {
            if welcome::greet(state, &join, &settings).await {
                Outcome::Welcomed
            } else {
                Outcome::Ignored
            }
        }
        InboundEvent::Text(msg) => {
            if let Some(command) = state.commands.route(&msg, &settings, &state.admins) {
                plugins::execute(state, &msg, settings, command).await;
                return Outcome::Command;
            }

            let verdict = filters::moderate(state, &msg, &settings).await;
            if verdict != ModerationVerdict::NoAction {
                return Outcome::Moderated(verdict);
            }

            match state.assist.route(&msg.text, &settings) {
                Some(request) => {
                    let reply = state.assistant.complete(&request.query, request.framing).await;
                    send_text(state.api.as_ref(), msg.chat_id, &reply, Some(msg.message_id)).await;
                    Outcome::Assisted
                }
                None => Outcome::Ignored,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::Framing;
    use crate::database::{ChatSettings, Feature, KvStore};
    use crate::testing::{BOT_HANDLE, Call, GLOBAL_ADMIN, Harness, TestStore};

    const CHAT: i64 = -100;
    const MEMBER: u64 = 50;

    fn text(from: u64, text: &str) -> InboundEvent {
        InboundEvent::Text(TextMessage {
            chat_id: CHAT,
            message_id: 7,
            from: Sender::new(from, "Someone"),
            text: text.to_string(),
            reply_to: None,
        })
    }

    fn reply(from: u64, text: &str, to: u64) -> InboundEvent {
        InboundEvent::Text(TextMessage {
            chat_id: CHAT,
            message_id: 7,
            from: Sender::new(from, "Someone"),
            text: text.to_string(),
            reply_to: Some(Sender::new(to, "Reza")),
        })
    }

    #[tokio::test]
    async fn test_warn_escalates_to_ban() {
        let h = Harness::new();
        let warn = || reply(GLOBAL_ADMIN, "/اخطار", MEMBER);

        assert_eq!(handle_event(&h.state, warn()).await, Outcome::Command);
        assert_eq!(handle_event(&h.state, warn()).await, Outcome::Command);
        assert_eq!(h.store.get(&format!("warn:{}:{}", CHAT, MEMBER)).await.unwrap().as_deref(), Some("2"));
        assert_eq!(handle_event(&h.state, warn()).await, Outcome::Command);

        assert_eq!(
            h.api.sent(),
            vec![
                "کاربر Reza اخطار گرفت. تعداد اخطارها: 1/3".to_string(),
                "کاربر Reza اخطار گرفت. تعداد اخطارها: 2/3".to_string(),
                "کاربر Reza به دلیل رسیدن به حد اخطار (3) بن شد.".to_string(),
            ]
        );
        assert!(h.api.calls().contains(&Call::Ban { chat_id: CHAT, user_id: MEMBER }));
        assert!(h.store.get(&format!("warn:{}:{}", CHAT, MEMBER)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_third_warn_bans_when_counter_cannot_be_cleared() {
        let h = Harness::with_store(TestStore::failing_deletes());
        for _ in 0..3 {
            handle_event(&h.state, reply(GLOBAL_ADMIN, "/اخطار", MEMBER)).await;
        }

        assert!(h.api.calls().contains(&Call::Ban { chat_id: CHAT, user_id: MEMBER }));
        assert_eq!(
            h.api.sent().last().map(String::as_str),
            Some("کاربر Reza به دلیل رسیدن به حد اخطار (3) بن شد.")
        );
    }

    #[tokio::test]
    async fn test_unmute_clears_warnings() {
        let h = Harness::new();
        handle_event(&h.state, reply(GLOBAL_ADMIN, "/اخطار", MEMBER)).await;
        handle_event(&h.state, reply(GLOBAL_ADMIN, "/باز", MEMBER)).await;

        assert_eq!(h.state.escalation.count(CHAT, MEMBER).await.unwrap(), 0);
        assert!(h.api.calls().iter().any(|c| matches!(c, Call::Restrict { user_id: MEMBER, .. })));
        assert_eq!(
            h.api.sent().last().map(String::as_str),
            Some("کاربر Reza از سکوت خارج شد و اخطارها پاک شد.")
        );
    }

    #[tokio::test]
    async fn test_mute_and_ban_commands() {
        let h = Harness::new();
        handle_event(&h.state, reply(GLOBAL_ADMIN, "/سکوت 60", MEMBER)).await;
        handle_event(&h.state, reply(GLOBAL_ADMIN, "/بن", MEMBER)).await;

        assert_eq!(
            h.api.sent(),
            vec![
                "کاربر Reza به مدت 60 ثانیه سکوت شد.".to_string(),
                "کاربر Reza بن شد.".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_toggle_persists() {
        let h = Harness::new();
        let outcome = handle_event(&h.state, text(GLOBAL_ADMIN, "/تنظیم لینک off")).await;
        assert_eq!(outcome, Outcome::Command);

        let raw = h.store.get(&format!("settings:{}", CHAT)).await.unwrap().unwrap();
        let stored = ChatSettings::parse(&raw).unwrap();
        assert!(!stored.is_enabled(Feature::DeleteLinks));
        assert_eq!(h.api.sent(), vec!["تنظیم لینک روی خاموش شد.".to_string()]);

        // Links are no longer deleted.
        let outcome = handle_event(&h.state, text(MEMBER, "https://fish.example")).await;
        assert_eq!(outcome, Outcome::Ignored);
    }

    #[tokio::test]
    async fn test_unknown_toggle_key_is_stored_verbatim() {
        let h = Harness::new();
        handle_event(&h.state, text(GLOBAL_ADMIN, "/تنظیم شب on")).await;

        let raw = h.store.get(&format!("settings:{}", CHAT)).await.unwrap().unwrap();
        assert!(ChatSettings::parse(&raw).unwrap().flag("شب"));
    }

    #[tokio::test]
    async fn test_member_link_is_deleted_once() {
        let h = Harness::new();
        let outcome = handle_event(&h.state, text(MEMBER, "visit https://x.com احمق")).await;

        assert_eq!(outcome, Outcome::Moderated(ModerationVerdict::DeleteMessage));
        assert_eq!(h.api.calls(), vec![Call::Delete { chat_id: CHAT, message_id: 7 }]);
    }

    #[tokio::test]
    async fn test_admin_link_is_kept() {
        let h = Harness::new();
        let outcome = handle_event(&h.state, text(GLOBAL_ADMIN, "visit https://x.com")).await;

        assert_eq!(outcome, Outcome::Ignored);
        assert!(h.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_non_admin_command_falls_through() {
        let h = Harness::new();
        let event = reply(MEMBER, "/بن", 60);

        assert_eq!(handle_event(&h.state, event).await, Outcome::Ignored);
        assert!(h.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_ask_command_replies() {
        let h = Harness::new();
        let outcome = handle_event(&h.state, text(MEMBER, "/ask شریمپ چه می‌خورد")).await;

        assert_eq!(outcome, Outcome::Assisted);
        assert_eq!(h.assistant.requests(), vec![("شریمپ چه می‌خورد".to_string(), Framing::Aquarium)]);
        assert_eq!(
            h.api.calls(),
            vec![Call::Send {
                chat_id: CHAT,
                text: "answer: شریمپ چه می‌خورد".to_string(),
                reply_to: Some(7),
            }]
        );
    }

    #[tokio::test]
    async fn test_member_mention_is_moderated_before_assist() {
        // "@" trips the link filter for regular members.
        let h = Harness::new();
        let outcome = handle_event(&h.state, text(MEMBER, &format!("@{} hi", BOT_HANDLE))).await;

        assert_eq!(outcome, Outcome::Moderated(ModerationVerdict::DeleteMessage));
        assert!(h.assistant.requests().is_empty());
    }

    #[tokio::test]
    async fn test_admin_mention_reaches_assistant() {
        let h = Harness::new();
        let outcome = handle_event(&h.state, text(GLOBAL_ADMIN, &format!("@{} hello there", BOT_HANDLE))).await;

        assert_eq!(outcome, Outcome::Assisted);
        assert_eq!(h.assistant.requests(), vec![("hello there".to_string(), Framing::General)]);
    }

    #[tokio::test]
    async fn test_welcome() {
        let h = Harness::new();
        let join = InboundEvent::NewChatMembers(MemberJoin {
            chat_id: CHAT,
            message_id: 3,
            from: Sender::new(MEMBER, "Sara"),
            members: vec![Sender::new(MEMBER, "Sara"), Sender::new(51, "Nima")],
        });

        assert_eq!(handle_event(&h.state, join.clone()).await, Outcome::Welcomed);
        assert_eq!(
            h.api.sent(),
            vec![
                format!("خوش آمدی Sara! قوانین را رعایت کن و @{} را منشن کن برای کمک.", BOT_HANDLE),
                format!("خوش آمدی Nima! قوانین را رعایت کن و @{} را منشن کن برای کمک.", BOT_HANDLE),
            ]
        );

        let mut settings = h.state.settings.get(CHAT).await;
        settings.welcome_message = Some("سلام {name}".to_string());
        h.state.settings.set(CHAT, &settings).await.unwrap();
        handle_event(&h.state, join.clone()).await;
        assert_eq!(h.api.sent().last().map(String::as_str), Some("سلام Nima"));

        settings.set_feature(Feature::Welcome, false);
        h.state.settings.set(CHAT, &settings).await.unwrap();
        assert_eq!(handle_event(&h.state, join).await, Outcome::Ignored);
    }

    #[tokio::test]
    async fn test_corrupt_settings_disable_everything() {
        let h = Harness::new();
        h.store.put(&format!("settings:{}", CHAT), "not json").await.unwrap();

        // Empty settings: no chat admins, every feature off.
        assert_eq!(handle_event(&h.state, text(MEMBER, "https://x.com")).await, Outcome::Ignored);
        assert_eq!(handle_event(&h.state, text(MEMBER, "/ask hi")).await, Outcome::Ignored);
        // Process-wide admins still count.
        assert_eq!(handle_event(&h.state, text(GLOBAL_ADMIN, "/تنظیم هوش on")).await, Outcome::Command);
    }
}
