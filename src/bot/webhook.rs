//! Webhook mode implementation for the bot.
//!
//! Uses teloxide's axum webhook support to:
//! - call `setWebhook` on Telegram (with the secret token, if any)
//! - serve updates plus a `GET /health` probe on one axum server
//! - call `deleteWebhook` on shutdown

use std::net::SocketAddr;

use anyhow::Context;
use axum::routing::get;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks::{self, Options};
use tracing::{error, info};
use url::Url;

use super::dispatcher::ThrottledBot;
use crate::config::Config;

async fn health() -> &'static str {
    "AquaWorld bot running."
}

/// Start the bot in webhook mode.
///
/// Telegram rejects updates whose secret header does not match
/// `WEBHOOK_SECRET`, so the secret never has to appear in the URL.
pub async fn start_webhook(
    config: &Config,
    mut dispatcher: Dispatcher<ThrottledBot, anyhow::Error, teloxide::dispatching::DefaultKey>,
    bot: ThrottledBot,
) -> anyhow::Result<()> {
    let webhook_url = config
        .webhook_url
        .as_deref()
        .context("WEBHOOK_URL must be set when using webhook mode")?;
    let url = Url::parse(webhook_url).context("Invalid WEBHOOK_URL format")?;

    // Listen on all interfaces at the configured port
    let address = SocketAddr::from(([0, 0, 0, 0], config.webhook_port));

    let mut options = Options::new(address, url.clone());
    if let Some(ref secret) = config.webhook_secret {
        options = options.secret_token(secret.clone());
        info!("Webhook secret token configured");
    }

    info!("🔗 Setting webhook URL: {}", url);
    info!("📡 Listening on: {}", address);

    // The webhook setup only needs basic API access, not the Throttle adaptor.
    let (listener, stop_flag, router) = webhooks::axum_to_router(bot.inner().clone(), options)
        .await
        .context("Failed to set up webhook")?;
    let app = router.route("/health", get(health));

    let tcp = tokio::net::TcpListener::bind(address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(tcp, app).with_graceful_shutdown(stop_flag).await {
            error!("Webhook server error: {}", e);
        }
    });

    info!("✅ Webhook setup complete, waiting for updates...");

    let error_handler = LoggingErrorHandler::with_custom_text("Error from update listener");
    dispatcher
        .dispatch_with_listener(listener, error_handler)
        .await;

    Ok(())
}
