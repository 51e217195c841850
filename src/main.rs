//! Memo Cache admin host
//!
//! Registers the host's memoized loaders and serves the cache admin API.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memo_cache::api::create_router;
use memo_cache::{memoize_async, memoize_named, AppState, CacheError, Config};

/// A loaded session, expensive enough to be worth caching.
#[derive(Debug, Clone)]
struct Session {
    id: String,
    loaded_at: String,
}

async fn load_session(session_id: String) -> Result<Session, CacheError> {
    // Stand-in for a slow scenario load
    tokio::time::sleep(Duration::from_millis(50)).await;

    Ok(Session {
        id: session_id,
        loaded_at: chrono::Utc::now().to_rfc3339(),
    })
}

fn price_multiplier((tick, volatility_bps): (u64, u32)) -> Result<u64, CacheError> {
    Ok(10_000 + (tick % 100) * u64::from(volatility_bps) / 100)
}

/// Main entry point for the Memo Cache admin host.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Register the host's memoized functions
/// 4. Start HTTP server on configured port
/// 5. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memo_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Memo Cache admin host");

    let config = Config::from_env();
    info!(
        "Configuration loaded: default_capacity={}, default_ttl={}s, port={}",
        config.default_capacity, config.default_ttl, config.server_port
    );

    let sessions = memoize_async(config.default_capacity, config.default_ttl(), load_session)
        .context("failed to create session cache")?;
    let multipliers = memoize_named(
        "price_multiplier",
        config.default_capacity,
        None,
        price_multiplier,
    )
    .context("failed to create price multiplier cache")?;

    let session = sessions.call("bootstrap".to_string()).await?;
    let multiplier = multipliers.call((0, 250))?;
    info!(
        "Caches warmed: session={} loaded_at={} multiplier={}",
        session.id, session.loaded_at, multiplier
    );

    let app = create_router(AppState::global());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
