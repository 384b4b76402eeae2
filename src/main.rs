//! AquaWorld - Telegram group moderation bot with an aquarium assistant.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `database` - Key-value storage (MongoDB or in-memory), settings and warnings
//! - `cache` - Moka caches
//! - `permissions` - Admin resolution
//! - `moderation` - Content filters and warning escalation
//! - `plugins` - Admin commands
//! - `events` - Per-event routing (commands, welcome, moderation, assistant)
//! - `assistant` - Completion backend
//! - `bot` - Telegram transport (with Throttle for API rate limiting)
//! - `utils` - Utility functions

mod assistant;
mod bot;
mod cache;
mod config;
mod database;
mod events;
mod moderation;
mod permissions;
mod plugins;
mod utils;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use teloxide::adaptors::throttle::Limits;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use assistant::OpenAiClient;
use bot::AppState;
use config::{Config, StoreBackend};
use database::{Database, KvStore, MemoryStore, MongoStore};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("aquaworld=info,teloxide=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting AquaWorld bot...");

    let config = Config::from_env()?;
    info!("Configuration loaded successfully");
    info!("Bot mode: {:?}", config.bot_mode);

    let store: Arc<dyn KvStore> = match config.store_backend {
        StoreBackend::Mongo => {
            let uri = config.mongodb_uri.as_deref().unwrap_or_default();
            info!("Connecting to MongoDB...");
            let db = Database::connect(uri, &config.mongodb_database).await?;
            info!("Database connected");
            Arc::new(MongoStore::new(&db))
        }
        StoreBackend::Memory => {
            info!("Using in-memory store; settings and warnings are lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    // Throttle respects Telegram's rate limits:
    // - 30 messages per second globally
    // - 1 message per second to the same chat
    // - 20 messages per minute to the same group
    let bot = Bot::new(&config.bot_token).throttle(Limits::default());
    info!("Bot initialized with rate limiting (Throttle)");

    let me = bot.get_me().await?;
    let bot_username = config
        .bot_username
        .clone()
        .unwrap_or_else(|| me.username().to_string());
    info!("Using bot username: @{}", bot_username);

    if config.admin_ids.is_empty() {
        info!("No process-wide admins configured (ADMIN_IDS is empty)");
    } else {
        info!("Process-wide admins: {:?}", config.admin_ids);
    }

    let assistant = OpenAiClient::new(config.assistant.clone())?;
    if !assistant.is_enabled() {
        info!("OPENAI_API_KEY not set, assistant replies with a notice");
    }

    let state = AppState::new(
        &config,
        store,
        Arc::new(bot.clone()),
        Arc::new(assistant),
        bot_username,
    )?;

    let dispatcher = bot::build_dispatcher(bot.clone(), state);
    bot::run(&config, bot, dispatcher).await?;

    Ok(())
}
