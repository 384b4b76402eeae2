//! Admin command handlers.
//!
//! [`CommandRouter`] recognizes the command grammar; each command's effect
//! lives in its own file:
//! - `settings` - feature flag toggles
//! - `ban` - immediate ban
//! - `warn` - warning escalation
//! - `mute` - timed mute and unmute

pub mod ban;
pub mod mute;
pub mod settings;
pub mod warn;

use regex::Regex;
use tracing::{debug, info};

use crate::bot::dispatcher::AppState;
use crate::config::CommandTokens;
use crate::database::ChatSettings;
use crate::events::{Sender, TextMessage};
use crate::permissions::AdminResolver;

/// Mute length when the command gives none.
pub const DEFAULT_MUTE_SECS: u64 = 3600;

/// A recognized admin command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    /// `/<settings> <key> on|off`
    Toggle { short_key: String, enabled: bool },
    Ban(Sender),
    Warn(Sender),
    Mute { target: Sender, seconds: u64 },
    Unmute(Sender),
}

/// Parses admin commands out of message text.
#[derive(Debug, Clone)]
pub struct CommandRouter {
    toggle: Regex,
    mute: Regex,
    ban: String,
    warn: String,
    unmute: String,
}

impl CommandRouter {
    pub fn new(tokens: &CommandTokens) -> Result<Self, regex::Error> {
        Ok(Self {
            toggle: Regex::new(&format!(
                r"(?i)^/{}\s+(\S+)\s+(on|off)",
                regex::escape(&tokens.settings)
            ))?,
            mute: Regex::new(&format!(r"(?i)^/{}(?:\s+([0-9]+))?", regex::escape(&tokens.mute)))?,
            ban: format!("/{}", tokens.ban),
            warn: format!("/{}", tokens.warn),
            unmute: format!("/{}", tokens.unmute),
        })
    }

    /// Recognize a command from an admin. Anyone else gets `None`.
    pub fn route(
        &self,
        msg: &TextMessage,
        settings: &ChatSettings,
        admins: &AdminResolver,
    ) -> Option<AdminCommand> {
        if msg.text.is_empty() || !admins.is_admin(msg.from.id, settings) {
            return None;
        }
        self.parse(msg)
    }

    /// Checks run in a fixed order; the first that fully matches wins.
    /// Commands aimed at a user need a reply and are skipped without one.
    fn parse(&self, msg: &TextMessage) -> Option<AdminCommand> {
        let text = msg.text.as_str();

        if let Some(caps) = self.toggle.captures(text) {
            return Some(AdminCommand::Toggle {
                short_key: caps[1].to_string(),
                enabled: caps[2].eq_ignore_ascii_case("on"),
            });
        }

        let target = msg.reply_to.clone();

        if text.starts_with(&self.ban) {
            match target.clone() {
                Some(t) => return Some(AdminCommand::Ban(t)),
                None => debug!("Ban command without reply in chat {}", msg.chat_id),
            }
        }

        if text.starts_with(&self.warn) {
            match target.clone() {
                Some(t) => return Some(AdminCommand::Warn(t)),
                None => debug!("Warn command without reply in chat {}", msg.chat_id),
            }
        }

        if let Some(caps) = self.mute.captures(text) {
            match target.clone() {
                Some(t) => {
                    // Only overflow can fail here; treat it as "very long".
                    let seconds = caps
                        .get(1)
                        .map(|m| m.as_str().parse().unwrap_or(u64::MAX))
                        .unwrap_or(DEFAULT_MUTE_SECS);
                    return Some(AdminCommand::Mute { target: t, seconds });
                }
                None => debug!("Mute command without reply in chat {}", msg.chat_id),
            }
        }

        if text.starts_with(&self.unmute) {
            match target {
                Some(t) => return Some(AdminCommand::Unmute(t)),
                None => debug!("Unmute command without reply in chat {}", msg.chat_id),
            }
        }

        None
    }
}

/// Run a recognized command.
pub async fn execute(state: &AppState, msg: &TextMessage, settings: ChatSettings, command: AdminCommand) {
    info!("Admin {} issued {:?} in chat {}", msg.from.id, command, msg.chat_id);

    match command {
        AdminCommand::Toggle { short_key, enabled } => {
            settings::toggle(state, msg.chat_id, settings, &short_key, enabled).await
        }
        AdminCommand::Ban(target) => ban::ban(state, msg, &target).await,
        AdminCommand::Warn(target) => warn::warn(state, msg, &target).await,
        AdminCommand::Mute { target, seconds } => mute::mute(state, msg, &target, seconds).await,
        AdminCommand::Unmute(target) => mute::unmute(state, msg, &target).await,
    }
}
