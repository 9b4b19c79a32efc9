//! Chameleon Server - session server for the Chameleon party word game
//!
//! This is the main entry point for the server. It handles:
//! - HTTP endpoints for creating, joining and running game sessions
//! - Role views polled by hosts and players
//! - Expiry of abandoned sessions

mod app;
mod config;
mod game;
mod http;
mod util;
mod words;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::AppState;
use crate::config::Config;
use crate::http::build_router;
use crate::util::time::init_server_time;
use crate::words::{WordBank, WordSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    // Initialize server time tracking
    init_server_time();

    info!("Starting Chameleon Server");
    info!("Server address: {}", config.server_addr);

    // Load word list
    let words: Arc<dyn WordSource> = match &config.words_path {
        Some(path) => Arc::new(WordBank::load(path)?),
        None => {
            let bank = WordBank::builtin()?;
            info!(
                categories = bank.category_count(),
                words = bank.word_count(),
                "Using built-in word list"
            );
            Arc::new(bank)
        }
    };

    // Create application state
    let state = AppState::new(config.clone(), words);

    // Spawn idle session reaper
    if !config.session_idle_timeout.is_zero() {
        let registry = state.registry.clone();
        let sweep_every = config.session_sweep_interval;
        let max_idle = config.session_idle_timeout;
        tokio::spawn(async move {
            registry.run_idle_reaper(sweep_every, max_idle).await;
        });
    }

    // Build router
    let router = build_router(state);

    // Start server
    let addr: SocketAddr = config.server_addr;
    let listener = TcpListener::bind(addr).await?;

    info!("Server listening on {}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        }
    }
}
