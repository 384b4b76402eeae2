//! Outbound Telegram actions.
//!
//! The engine only sees [`ChatApi`]; the throttled teloxide bot is the
//! production implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use teloxide::prelude::*;
use teloxide::types::{ChatPermissions, MessageId, ReplyParameters, UserId};

use super::dispatcher::ThrottledBot;

/// Member restriction to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restriction {
    /// Every permission off. `None` means until lifted.
    Muted { until: Option<DateTime<Utc>> },
    /// Every permission on, no deadline.
    Unrestricted,
}

/// Messaging capabilities the engine needs.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn delete_message(&self, chat_id: i64, message_id: i32) -> anyhow::Result<()>;

    async fn ban_chat_member(&self, chat_id: i64, user_id: u64) -> anyhow::Result<()>;

    async fn restrict_chat_member(
        &self,
        chat_id: i64,
        user_id: u64,
        restriction: Restriction,
    ) -> anyhow::Result<()>;

    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i32>,
    ) -> anyhow::Result<()>;
}

/// Permissions of a regular, unrestricted member.
fn full_permissions() -> ChatPermissions {
    ChatPermissions::SEND_MESSAGES
        | ChatPermissions::SEND_AUDIOS
        | ChatPermissions::SEND_DOCUMENTS
        | ChatPermissions::SEND_PHOTOS
        | ChatPermissions::SEND_VIDEOS
        | ChatPermissions::SEND_VIDEO_NOTES
        | ChatPermissions::SEND_VOICE_NOTES
        | ChatPermissions::SEND_POLLS
        | ChatPermissions::SEND_OTHER_MESSAGES
        | ChatPermissions::ADD_WEB_PAGE_PREVIEWS
}

#[async_trait]
impl ChatApi for ThrottledBot {
    async fn delete_message(&self, chat_id: i64, message_id: i32) -> anyhow::Result<()> {
        Requester::delete_message(self, ChatId(chat_id), MessageId(message_id)).await?;
        Ok(())
    }

    async fn ban_chat_member(&self, chat_id: i64, user_id: u64) -> anyhow::Result<()> {
        Requester::ban_chat_member(self, ChatId(chat_id), UserId(user_id)).await?;
        Ok(())
    }

    async fn restrict_chat_member(
        &self,
        chat_id: i64,
        user_id: u64,
        restriction: Restriction,
    ) -> anyhow::Result<()> {
        let (chat_id, user_id) = (ChatId(chat_id), UserId(user_id));
        match restriction {
            Restriction::Muted { until } => {
                let req = Requester::restrict_chat_member(self, chat_id, user_id, ChatPermissions::empty());
                match until {
                    Some(dt) => req.until_date(dt).await?,
                    None => req.await?,
                };
            }
            Restriction::Unrestricted => {
                Requester::restrict_chat_member(self, chat_id, user_id, full_permissions()).await?;
            }
        }
        Ok(())
    }

    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i32>,
    ) -> anyhow::Result<()> {
        let req = Requester::send_message(self, ChatId(chat_id), text);
        match reply_to {
            Some(id) => req.reply_parameters(ReplyParameters::new(MessageId(id))).await?,
            None => req.await?,
        };
        Ok(())
    }
}
