//! Configuration module for the AquaWorld bot.
//!
//! Loads configuration from environment variables.

use std::env;

use anyhow::{Context, bail};
use serde::Deserialize;

/// Bot running mode
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BotMode {
    #[default]
    Polling,
    Webhook,
}

/// Where chat settings and warning counters live.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Mongo,
    /// Process-local store, lost on restart. Handy for local runs.
    Memory,
}

/// Literal command tokens admins type (without the leading `/`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTokens {
    pub settings: String,
    pub ban: String,
    pub warn: String,
    pub mute: String,
    pub unmute: String,
    pub ask: String,
}

impl Default for CommandTokens {
    fn default() -> Self {
        Self {
            settings: "تنظیم".to_string(),
            ban: "بن".to_string(),
            warn: "اخطار".to_string(),
            mute: "سکوت".to_string(),
            unmute: "باز".to_string(),
            ask: "ask".to_string(),
        }
    }
}

/// Completion backend settings.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// `None` disables the assistant; users get a fallback text instead.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            max_tokens: 600,
            temperature: 0.7,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    pub bot_token: String,
    pub bot_mode: BotMode,
    pub webhook_url: Option<String>,
    pub webhook_port: u16,
    pub webhook_secret: Option<String>,

    /// Bot handle (without @), used for mention detection.
    /// Optional - will be fetched via getMe if not set.
    pub bot_username: Option<String>,

    /// Process-wide admin IDs (comma-separated `ADMIN_IDS`).
    /// Unioned with each chat's own admin list.
    pub admin_ids: Vec<u64>,

    // Storage
    pub store_backend: StoreBackend,
    pub mongodb_uri: Option<String>,
    pub mongodb_database: String,

    pub assistant: AssistantConfig,
    pub commands: CommandTokens,
}

impl Config {
    /// Load configuration from environment variables (and `.env`).
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bot_token = var("BOT_TOKEN").context("BOT_TOKEN must be set")?;

        let bot_mode = match var("BOT_MODE").unwrap_or_default().to_lowercase().as_str() {
            "webhook" => BotMode::Webhook,
            _ => BotMode::Polling,
        };

        let webhook_url = var("WEBHOOK_URL");
        if bot_mode == BotMode::Webhook && webhook_url.is_none() {
            bail!("WEBHOOK_URL must be set when BOT_MODE is webhook");
        }

        let webhook_port = match var("WEBHOOK_PORT") {
            Some(p) => p
                .parse::<u16>()
                .with_context(|| format!("invalid WEBHOOK_PORT: {}", p))?,
            None => 8080,
        };

        let admin_ids = var("ADMIN_IDS")
            .unwrap_or_default()
            .split(',')
            .filter_map(|s| s.trim().parse::<u64>().ok())
            .collect();

        // Strip @ if present
        let bot_username = var("BOT_USERNAME")
            .map(|s| s.trim_start_matches('@').to_string())
            .filter(|s| !s.is_empty());

        let store_backend = match var("STORE_BACKEND").unwrap_or_default().to_lowercase().as_str() {
            "memory" => StoreBackend::Memory,
            _ => StoreBackend::Mongo,
        };

        let mongodb_uri = var("MONGODB_URI");
        if store_backend == StoreBackend::Mongo && mongodb_uri.is_none() {
            bail!("MONGODB_URI must be set unless STORE_BACKEND is memory");
        }

        let defaults = AssistantConfig::default();
        let assistant = AssistantConfig {
            api_key: var("OPENAI_API_KEY"),
            model: var("OPENAI_MODEL").unwrap_or(defaults.model),
            base_url: var("OPENAI_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            ..defaults
        };

        Ok(Self {
            bot_token,
            bot_mode,
            webhook_url,
            webhook_port,
            webhook_secret: var("WEBHOOK_SECRET"),
            bot_username,
            admin_ids,
            store_backend,
            mongodb_uri,
            mongodb_database: var("MONGODB_DATABASE").unwrap_or_else(|| "aquaworld".to_string()),
            assistant,
            commands: CommandTokens::default(),
        })
    }
}
