//! Emotion diary bot
//!
//! A Telegram bot that walks a user through describing a situation, picking
//! emotions from a taxonomy, and writing down thoughts and actions, then sends
//! back a summary.

mod api;
mod config;
mod keepalive;
mod keyboard;
mod prompts;
mod runtime;
mod session;
mod state_machine;
mod taxonomy;
mod telegram;

use api::{create_router, AppState};
use config::{Config, POLL_INTERVAL, POLL_TIMEOUT, SELF_PING_INTERVAL};
use runtime::RuntimeManager;
use session::InMemorySessionStore;
use std::net::SocketAddr;
use std::sync::Arc;
use taxonomy::EmotionCatalog;
use telegram::{TelegramClient, UpdatePoller};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "emotion_diary=info,tower_http=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Panics in handler tasks are contained by tokio; make sure they are logged
    std::panic::set_hook(Box::new(|info| {
        tracing::error!(panic = %info, "Unhandled panic");
    }));

    // Configuration and taxonomy: any failure here is fatal
    let config = Config::from_env()?;
    tracing::info!(?config, "Configuration loaded");

    let catalog = Arc::new(EmotionCatalog::load(&config.emotions_path)?);
    tracing::info!(
        path = %config.emotions_path.display(),
        base_emotions = catalog.len(),
        "Emotion taxonomy loaded"
    );

    let sessions = Arc::new(InMemorySessionStore::new());
    let client = Arc::new(TelegramClient::new(
        &config.api_url,
        &config.token,
        POLL_TIMEOUT,
    )?);
    let manager = Arc::new(RuntimeManager::new(
        catalog,
        sessions.clone(),
        client.clone(),
    ));
    let cancel = CancellationToken::new();

    // Health surface
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let app = create_router(AppState::new(sessions));
    tracing::info!("Health endpoint listening on {}", addr);
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "Health server stopped");
        }
    });

    // Keepalive
    tokio::spawn(keepalive::run(
        format!("http://localhost:{}/", config.port),
        SELF_PING_INTERVAL,
        cancel.clone(),
    ));

    // Ctrl-C stops polling; the dispatcher drains and main returns
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                return;
            }
            tracing::info!("Shutdown requested");
            cancel.cancel();
        }
    });

    // Updates flow poller -> dispatcher -> chat runtimes
    let (inbound_tx, inbound_rx) = mpsc::channel(256);
    let poller = UpdatePoller::new(client, POLL_INTERVAL, POLL_TIMEOUT);
    tokio::spawn(poller.run(inbound_tx, cancel));

    manager.run(inbound_rx).await;
    Ok(())
}
