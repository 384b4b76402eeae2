//! Per-chat settings model.
//!
//! Stored as one JSON object per chat. Feature flags live at the top level
//! of that object next to the structured fields, and the set of flag names
//! is open: admins may toggle names the bot does not know about, and those
//! survive a save/load cycle untouched.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Feature flags the bot itself acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    DeleteLinks,
    DeleteProfanity,
    /// Recognized but not enforced yet.
    DeleteMedia,
    /// Recognized but not enforced yet.
    AntiSpam,
    Welcome,
    AiOnMention,
    AiOnCommand,
}

impl Feature {
    pub const ALL: [Feature; 7] = [
        Feature::DeleteLinks,
        Feature::DeleteProfanity,
        Feature::DeleteMedia,
        Feature::AntiSpam,
        Feature::Welcome,
        Feature::AiOnMention,
        Feature::AiOnCommand,
    ];

    /// Field name in the stored JSON object.
    pub fn key(self) -> &'static str {
        match self {
            Self::DeleteLinks => "delete_links",
            Self::DeleteProfanity => "delete_profanity",
            Self::DeleteMedia => "delete_media",
            Self::AntiSpam => "anti_spam",
            Self::Welcome => "welcome",
            Self::AiOnMention => "ai_on_mention",
            Self::AiOnCommand => "ai_on_command",
        }
    }

    /// Short name admins type in the settings command.
    pub fn short_key(self) -> &'static str {
        match self {
            Self::DeleteLinks => "لینک",
            Self::DeleteProfanity => "فحش",
            Self::DeleteMedia => "رسانه",
            Self::AntiSpam => "ضداسپم",
            Self::Welcome => "خوشامد",
            Self::AiOnMention => "هوش",
            Self::AiOnCommand => "دستوری",
        }
    }

    pub fn from_short_key(short: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.short_key() == short)
    }

    fn default_enabled(self) -> bool {
        !matches!(self, Self::DeleteMedia)
    }
}

/// Resolve a settings-command short key to the stored flag name.
/// Unknown short keys are used verbatim.
pub fn flag_name(short: &str) -> String {
    Feature::from_short_key(short)
        .map(|f| f.key().to_string())
        .unwrap_or_else(|| short.to_string())
}

/// Built-in profanity list for new chats.
pub const DEFAULT_PROFANITY: [&str; 14] = [
    "بی‌شعور", "احمق", "دروغگو", "حرومزاده", "بزدل", "نادان", "بی‌ادب", "کله‌خر", "مزخرف", "خفه‌شو",
    "کیر", "کس", "سکس", "کسکش",
];

/// Field names taken by structured settings; they cannot be used as flags.
const RESERVED_FIELDS: [&str; 3] = ["profanity_list", "admins", "welcome_message"];

/// Settings of one chat.
///
/// `Default` is the *empty* configuration: every flag off, no admins,
/// no profanity list. New chats get [`ChatSettings::defaults`] instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatSettings {
    /// Matched case-insensitively by containment, in order.
    #[serde(default)]
    pub profanity_list: Vec<String>,

    /// Chat-local admins.
    #[serde(default)]
    pub admins: BTreeSet<u64>,

    /// Welcome template, `{name}` is the new member's first name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub welcome_message: Option<String>,

    #[serde(flatten)]
    flags: BTreeMap<String, bool>,
}

impl ChatSettings {
    /// Settings for a chat seen for the first time.
    pub fn defaults(global_admins: &[u64]) -> Self {
        Self {
            profanity_list: DEFAULT_PROFANITY.iter().map(|w| w.to_string()).collect(),
            admins: global_admins.iter().copied().collect(),
            welcome_message: None,
            flags: Feature::ALL
                .into_iter()
                .map(|f| (f.key().to_string(), f.default_enabled()))
                .collect(),
        }
    }

    /// Parse stored JSON, `None` when it is unreadable.
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.flag(feature.key())
    }

    /// Any flag by stored name. Missing flags are off.
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    /// Set a flag by stored name.
    ///
    /// Returns `false` (and changes nothing) when `name` is a structured
    /// field rather than a flag.
    pub fn set_flag(&mut self, name: &str, enabled: bool) -> bool {
        if RESERVED_FIELDS.contains(&name) {
            return false;
        }
        self.flags.insert(name.to_string(), enabled);
        true
    }

    pub fn set_feature(&mut self, feature: Feature, enabled: bool) {
        self.flags.insert(feature.key().to_string(), enabled);
    }
}
